//! Sign/verify protocol driver.
//!
//! [`SigilClient`] connects the notary transport to the local stores. Its
//! commit discipline is the core of the crate:
//! - A ledger entry exists only after the sign reply decoded successfully;
//!   a failed request leaves the ledger untouched and the caller keeps the
//!   input.
//! - A verification verdict (pass or fail) is only ever written from a
//!   decoded verify reply; transport failures never masquerade as a failed
//!   verification.
//! - Thread sends reach the registry only after the service accepted the
//!   message; pushed peer messages are committed as they arrive.
//!
//! All mutable state lives in the stores, each behind its own lock. No lock
//! is held across a transport call, so concurrent operations interleave
//! freely and sequence numbers reflect reply arrival, not issue order.

use crate::identity::Identity;
use crate::ledger::{Ledger, LedgerEntry, LedgerError};
use crate::snapshot::{self, BlobStore, SnapshotError};
use crate::threads::{ThreadMessage, ThreadRegistry, COMPOSE_THREAD};
use crate::transport::{Notary, PushStream, TransportError};
use crate::wire::{self, NotaryRequest, PushEvent, WireError};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

/// Errors surfaced by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// No node identity is bound; signing and sending are refused.
    #[error("Not connected to a node identity")]
    Disconnected,

    /// The compose placeholder is selected; there is no counterparty.
    #[error("No thread selected")]
    NoThreadSelected,
}

/// Protocol driver for one session against a notary service.
pub struct SigilClient<T: Notary> {
    notary: T,
    identity: Option<Identity>,
    ledger: Mutex<Ledger>,
    threads: Mutex<ThreadRegistry>,
    store: Option<Box<dyn BlobStore>>,
}

impl<T: Notary> SigilClient<T> {
    /// Create a client. Without an identity the client runs disconnected:
    /// reads work, everything that talks to the notary is refused.
    pub fn new(notary: T, identity: Option<Identity>) -> Self {
        Self {
            notary,
            identity,
            ledger: Mutex::new(Ledger::new()),
            threads: Mutex::new(ThreadRegistry::new()),
            store: None,
        }
    }

    /// Attach a blob store; thread changes are persisted through it.
    pub fn with_store(mut self, store: Box<dyn BlobStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.identity.is_some()
    }

    fn require_identity(&self) -> Result<&Identity, ClientError> {
        self.identity.as_ref().ok_or(ClientError::Disconnected)
    }

    /// Have the notary sign a message and record it in the ledger.
    ///
    /// Returns the sequence number of the committed entry. Nothing is
    /// appended until the reply decoded; there are no pending entries to
    /// clean up after a failure.
    pub async fn sign_message(&self, text: &str) -> Result<u64, ClientError> {
        self.require_identity()?;

        let message = text.as_bytes().to_vec();
        let request = NotaryRequest::Sign(message.clone());
        let body = self.notary.submit(&request).await?;
        let signature = wire::decode_sign_reply(&body)?;

        let mut ledger = self.ledger.lock().await;
        let sequence = ledger.append_pending(message);
        ledger.commit_signature(sequence, signature)?;
        Ok(sequence)
    }

    /// Check a ledger entry's signature against the notary.
    ///
    /// The entry must already carry a signature; otherwise this fails
    /// without a round trip. The verdict is committed back to the entry. A
    /// transport failure leaves the previous verification state in place.
    pub async fn verify_entry(&self, sequence: u64) -> Result<bool, ClientError> {
        self.require_identity()?;

        let (message, signature) = {
            let ledger = self.ledger.lock().await;
            let entry = ledger
                .get(sequence)
                .ok_or(LedgerError::OutOfRange(sequence))?;
            let signature = entry
                .signature
                .clone()
                .ok_or(LedgerError::Unsigned(sequence))?;
            (entry.message.clone(), signature)
        };

        let request = NotaryRequest::Verify(message, signature);
        let body = self.notary.submit(&request).await?;
        let verified = wire::decode_verify_reply(&body)?;

        let mut ledger = self.ledger.lock().await;
        ledger.commit_verification(sequence, verified)?;
        Ok(verified)
    }

    /// Open (or switch to) a thread with a counterparty. Purely local.
    pub async fn start_thread(&self, counterparty: &str) -> Result<(), ClientError> {
        self.require_identity()?;

        let mut threads = self.threads.lock().await;
        threads.ensure(counterparty);
        threads.select(counterparty);
        drop(threads);

        self.persist_threads().await;
        Ok(())
    }

    /// Sign-and-send into the selected thread.
    ///
    /// The notary must accept the message before it lands in the thread;
    /// the signature itself is not kept, threads store cleartext. Fails
    /// when the compose placeholder is selected.
    pub async fn send_message(&self, content: &str) -> Result<(), ClientError> {
        let identity = self.require_identity()?;
        let author = identity.node.to_string();

        let counterparty = {
            let threads = self.threads.lock().await;
            let selected = threads.selected().to_string();
            if selected == COMPOSE_THREAD {
                return Err(ClientError::NoThreadSelected);
            }
            selected
        };

        let request = NotaryRequest::Sign(content.as_bytes().to_vec());
        let body = self.notary.submit(&request).await?;
        wire::decode_sign_reply(&body)?;

        let mut threads = self.threads.lock().await;
        threads.append(
            &counterparty,
            ThreadMessage {
                author,
                content: content.to_string(),
            },
        );
        drop(threads);

        self.persist_threads().await;
        Ok(())
    }

    /// Commit a pushed peer message, creating its thread when unseen.
    /// Messages aimed at the compose placeholder are dropped.
    pub async fn apply_push(&self, event: PushEvent) {
        match event {
            PushEvent::NewMessage(message) => {
                let mut threads = self.threads.lock().await;
                threads.ensure(&message.id);
                let appended = threads.append(
                    &message.id,
                    ThreadMessage {
                        author: message.author,
                        content: message.content,
                    },
                );
                drop(threads);

                if appended {
                    self.persist_threads().await;
                }
            }
        }
    }

    /// Fetch the server-side history and replace the local threads with it.
    pub async fn load_history(&self) -> Result<(), ClientError> {
        let body = self.notary.fetch_history().await?;
        let history = wire::decode_history(&body)?;

        let mut threads = self.threads.lock().await;
        threads.load_snapshot(history);
        drop(threads);

        self.persist_threads().await;
        Ok(())
    }

    /// Open the push channel. Refused while disconnected.
    pub async fn subscribe(&self) -> Result<PushStream, ClientError> {
        self.require_identity()?;
        Ok(self.notary.subscribe().await?)
    }

    /// Restore threads from the attached blob store. Returns whether a
    /// snapshot was found.
    pub async fn restore_threads(&self) -> Result<bool, ClientError> {
        let store = match &self.store {
            Some(store) => store,
            None => return Ok(false),
        };

        match snapshot::load_threads(store.as_ref())? {
            Some(threads_map) => {
                let mut threads = self.threads.lock().await;
                threads.load_snapshot(threads_map);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Snapshot of the ledger, oldest entry first.
    pub async fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.ledger.lock().await.entries().to_vec()
    }

    pub async fn entry(&self, sequence: u64) -> Option<LedgerEntry> {
        self.ledger.lock().await.get(sequence).cloned()
    }

    /// Thread contents for a counterparty.
    pub async fn thread(&self, counterparty: &str) -> Option<Vec<ThreadMessage>> {
        self.threads
            .lock()
            .await
            .thread(counterparty)
            .map(|t| t.to_vec())
    }

    /// Known thread keys, sorted, placeholder included.
    pub async fn counterparties(&self) -> Vec<String> {
        self.threads.lock().await.counterparties()
    }

    pub async fn selected_thread(&self) -> String {
        self.threads.lock().await.selected().to_string()
    }

    /// Write the current threads through the blob store, if one is attached.
    /// Persistence failures are logged, never fatal.
    async fn persist_threads(&self) {
        let store = match &self.store {
            Some(store) => store,
            None => return,
        };

        let threads = self.threads.lock().await;
        let exported = threads.export();
        drop(threads);

        if let Err(e) = snapshot::save_threads(store.as_ref(), exported) {
            warn!("Failed to persist threads: {}", e);
        }
    }
}
