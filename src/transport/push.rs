//! Push channel stream plumbing.
//!
//! A [`PushStream`] is the consuming half of an unbounded channel of decoded
//! push events. Whatever feeds it (the websocket reader task in production,
//! a test handle in mocks) holds the [`PushSender`].

use crate::wire::PushEvent;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Stream of push events in arrival order.
///
/// Best effort: events from before the subscription or after a disconnect
/// are never replayed.
pub struct PushStream {
    receiver: mpsc::UnboundedReceiver<PushEvent>,
}

impl PushStream {
    /// Create a stream and the sender that feeds it.
    pub fn channel() -> (Self, PushSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { receiver }, PushSender { sender })
    }
}

impl Stream for PushStream {
    type Item = PushEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Sender half feeding a [`PushStream`].
#[derive(Clone)]
pub struct PushSender {
    sender: mpsc::UnboundedSender<PushEvent>,
}

impl PushSender {
    /// Forward one event; fails once the stream side is gone.
    pub fn send(&self, event: PushEvent) -> Result<(), String> {
        self.sender
            .send(event)
            .map_err(|_| "push stream closed".to_string())
    }
}
