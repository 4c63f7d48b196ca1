//! Transport layer for the notary service.
//!
//! The driver only ever talks to the [`Notary`] trait. `HttpNotary` is the
//! production implementation; `MockNotary` scripts the service for tests.

pub mod http;
pub mod mock;
pub mod push;
pub mod traits;

pub use http::HttpNotary;
pub use mock::MockNotary;
pub use push::{PushSender, PushStream};
pub use traits::{Notary, TransportError, TransportResult};
