//! JSON wire envelopes for the notary service.
//!
//! Every request and reply is a single-key JSON object:
//! - Requests: `{"Sign": [bytes]}` or `{"Verify": [[message], [signature]]}`
//! - Replies: `{"Ok": ...}` or `{"Err": "reason"}`
//! - Push frames: `{"NewMessage": {"id", "author", "content"}}`
//! - History: `{"History": {"messages": {peer: [{author, content}]}}}`
//!
//! Nothing else in the crate touches raw JSON; the envelope shapes live here
//! and are decoded into typed values before any state is mutated.

use crate::threads::ThreadMessage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Wire-level errors.
#[derive(Debug, Error)]
pub enum WireError {
    /// Body was not the expected envelope.
    #[error("Malformed reply: {0}")]
    Decode(String),

    /// The service answered with its error arm.
    #[error("Service rejected request: {0}")]
    Rejected(String),
}

/// Request envelope submitted to the notary service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotaryRequest {
    /// Sign the given message bytes.
    Sign(Vec<u8>),
    /// Check a signature against the message it was issued for.
    Verify(Vec<u8>, Vec<u8>),
}

/// A peer message delivered over the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Thread the message belongs to (the counterparty node).
    pub id: String,
    pub author: String,
    pub content: String,
}

/// Push channel frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushEvent {
    NewMessage(NewMessage),
}

#[derive(Debug, Deserialize)]
enum HistoryReply {
    History {
        messages: HashMap<String, Vec<ThreadMessage>>,
    },
}

/// Decode a sign reply into the signature bytes.
pub fn decode_sign_reply(body: &[u8]) -> Result<Vec<u8>, WireError> {
    let reply: Result<Vec<u8>, String> =
        serde_json::from_slice(body).map_err(|e| WireError::Decode(e.to_string()))?;
    reply.map_err(WireError::Rejected)
}

/// Decode a verify reply into the service's verdict.
pub fn decode_verify_reply(body: &[u8]) -> Result<bool, WireError> {
    let reply: Result<bool, String> =
        serde_json::from_slice(body).map_err(|e| WireError::Decode(e.to_string()))?;
    reply.map_err(WireError::Rejected)
}

/// Decode a push channel text frame.
pub fn decode_push(frame: &str) -> Result<PushEvent, WireError> {
    serde_json::from_str(frame).map_err(|e| WireError::Decode(e.to_string()))
}

/// Decode the thread history body into per-counterparty message lists.
pub fn decode_history(body: &[u8]) -> Result<HashMap<String, Vec<ThreadMessage>>, WireError> {
    let HistoryReply::History { messages } =
        serde_json::from_slice(body).map_err(|e| WireError::Decode(e.to_string()))?;
    Ok(messages)
}
