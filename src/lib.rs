//! Sigil - message ledger client for a remote notary service
//!
//! Sigil submits messages to a signing service, keeps the returned
//! signatures in an append-only session ledger, and checks them back
//! against the service on demand. Peer messages arrive over a best-effort
//! push channel and land in per-counterparty threads.
//!
//! Key principles:
//! - Commit only after success: no ledger entry without a decoded reply
//! - Single-attempt transport (no retries, no queues)
//! - Transport failures are never recorded as verification verdicts
//! - Threads persist through an injected blob store, the ledger does not

pub mod client;
pub mod identity;
pub mod ledger;
pub mod snapshot;
pub mod threads;
pub mod transport;
pub mod wire;
