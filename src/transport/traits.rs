//! Notary transport abstraction.
//!
//! One trait, three operations, single-attempt semantics: no retries, no
//! backoff, no queueing. A failed call reports why and changes nothing.

use super::push::PushStream;
use crate::wire::NotaryRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-level errors. None of these imply anything about the payload;
/// a request that died here may or may not have reached the service.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never completed (connect failure, dropped connection).
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with a non-success HTTP status.
    #[error("Service returned status {0}")]
    Status(u16),

    /// The push channel could not be established.
    #[error("Push channel unavailable: {0}")]
    PushUnavailable(String),
}

/// Client abstraction for the notary service.
#[async_trait]
pub trait Notary: Send + Sync {
    /// Submit a sign or verify envelope; returns the raw reply body.
    ///
    /// Exactly one attempt is made. Decoding the body is the caller's job.
    async fn submit(&self, request: &NotaryRequest) -> TransportResult<Vec<u8>>;

    /// Fetch the server-side thread history body.
    async fn fetch_history(&self) -> TransportResult<Vec<u8>>;

    /// Open the push channel.
    ///
    /// Establishment happens once; events missed before or after the
    /// stream's lifetime are never replayed. The stream ends when the
    /// connection drops.
    async fn subscribe(&self) -> TransportResult<PushStream>;
}
