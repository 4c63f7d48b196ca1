//! Append-only ledger of signed messages.
//!
//! Every locally signed message lands here: message bytes, the signature the
//! notary returned, and the latest verification verdict. Entries are never
//! removed or reordered; the sequence number records commit order, which is
//! the only ordering the ledger guarantees.

use thiserror::Error;

/// Verification state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Signed but never checked against the service.
    Unchecked,
    /// The service confirmed the signature.
    Verified,
    /// The service reported the signature invalid.
    Failed,
}

/// One signed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Position in commit order, assigned on append.
    pub sequence: u64,
    /// Opaque message bytes as submitted to the notary.
    pub message: Vec<u8>,
    /// Signature returned by the notary. Write-once.
    pub signature: Option<Vec<u8>>,
    /// Latest verification verdict; re-verification overwrites it.
    pub verification: Verification,
}

/// Ledger precondition violations. The store is left unchanged by all of them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No entry at sequence {0}")]
    OutOfRange(u64),

    #[error("Entry {0} already has a signature")]
    SignatureAlreadySet(u64),

    #[error("Entry {0} has no signature to verify")]
    Unsigned(u64),
}

/// Append-only store of signed messages.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and assign the next sequence number.
    ///
    /// The entry starts without a signature and `Unchecked`.
    pub fn append_pending(&mut self, message: Vec<u8>) -> u64 {
        let sequence = self.entries.len() as u64;
        self.entries.push(LedgerEntry {
            sequence,
            message,
            signature: None,
            verification: Verification::Unchecked,
        });
        sequence
    }

    /// Attach the notary's signature to an entry. Write-once.
    pub fn commit_signature(&mut self, sequence: u64, signature: Vec<u8>) -> Result<(), LedgerError> {
        let entry = self
            .entries
            .get_mut(sequence as usize)
            .ok_or(LedgerError::OutOfRange(sequence))?;

        if entry.signature.is_some() {
            return Err(LedgerError::SignatureAlreadySet(sequence));
        }

        entry.signature = Some(signature);
        Ok(())
    }

    /// Record a verification verdict for a signed entry.
    ///
    /// Only entries that carry a signature can be verified; the verdict may
    /// be overwritten by a later verification.
    pub fn commit_verification(&mut self, sequence: u64, verified: bool) -> Result<(), LedgerError> {
        let entry = self
            .entries
            .get_mut(sequence as usize)
            .ok_or(LedgerError::OutOfRange(sequence))?;

        if entry.signature.is_none() {
            return Err(LedgerError::Unsigned(sequence));
        }

        entry.verification = if verified {
            Verification::Verified
        } else {
            Verification::Failed
        };
        Ok(())
    }

    pub fn get(&self, sequence: u64) -> Option<&LedgerEntry> {
        self.entries.get(sequence as usize)
    }

    /// All entries in commit order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
