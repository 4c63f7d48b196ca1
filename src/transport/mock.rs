//! Mock notary for testing.
//!
//! Scripts the service end of the protocol: FIFO reply bodies (optionally
//! delayed, for commit-order tests), a canned history body, and a handle for
//! injecting push events. Submitted envelopes are recorded for assertions.

use super::push::{PushSender, PushStream};
use super::traits::{Notary, TransportError, TransportResult};
use crate::wire::NotaryRequest;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock notary with scripted replies.
#[derive(Clone)]
pub struct MockNotary {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    submitted: Vec<NotaryRequest>,
    replies: VecDeque<ScriptedReply>,
    history: Option<Vec<u8>>,
    push_stream: Option<PushStream>,
    push_sender: PushSender,
    fail_subscribe: bool,
}

struct ScriptedReply {
    body: TransportResult<Vec<u8>>,
    delay: Option<Duration>,
}

impl MockNotary {
    pub fn new() -> Self {
        let (stream, sender) = PushStream::channel();
        Self {
            state: Arc::new(Mutex::new(MockState {
                submitted: Vec::new(),
                replies: VecDeque::new(),
                history: None,
                push_stream: Some(stream),
                push_sender: sender,
                fail_subscribe: false,
            })),
        }
    }

    /// Queue the reply body for the next submit.
    pub fn push_reply(&self, body: TransportResult<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        state.replies.push_back(ScriptedReply { body, delay: None });
    }

    /// Queue a reply that arrives only after a delay.
    pub fn push_delayed_reply(&self, body: TransportResult<Vec<u8>>, delay: Duration) {
        let mut state = self.state.lock().unwrap();
        state.replies.push_back(ScriptedReply {
            body,
            delay: Some(delay),
        });
    }

    /// Set the body returned by `fetch_history`.
    pub fn set_history(&self, body: Vec<u8>) {
        self.state.lock().unwrap().history = Some(body);
    }

    /// Make `subscribe` fail with `PushUnavailable`.
    pub fn fail_subscribe(&self) {
        self.state.lock().unwrap().fail_subscribe = true;
    }

    /// Handle for injecting push events into the subscribed stream.
    pub fn push_handle(&self) -> PushSender {
        self.state.lock().unwrap().push_sender.clone()
    }

    /// Requests recorded by `submit`, in submission order.
    pub fn submitted(&self) -> Vec<NotaryRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Recorded requests as they would appear on the wire.
    pub fn submitted_wire(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .submitted
            .iter()
            .map(|request| serde_json::to_string(request).unwrap())
            .collect()
    }
}

impl Default for MockNotary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notary for MockNotary {
    async fn submit(&self, request: &NotaryRequest) -> TransportResult<Vec<u8>> {
        let (body, delay) = {
            let mut state = self.state.lock().unwrap();
            state.submitted.push(request.clone());
            let reply = state.replies.pop_front().unwrap_or_else(|| ScriptedReply {
                body: Err(TransportError::Request("no scripted reply".to_string())),
                delay: None,
            });
            (reply.body, reply.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        body
    }

    async fn fetch_history(&self) -> TransportResult<Vec<u8>> {
        let state = self.state.lock().unwrap();
        match &state.history {
            Some(body) => Ok(body.clone()),
            None => Err(TransportError::Status(404)),
        }
    }

    async fn subscribe(&self) -> TransportResult<PushStream> {
        let mut state = self.state.lock().unwrap();
        if state.fail_subscribe {
            return Err(TransportError::PushUnavailable(
                "scripted failure".to_string(),
            ));
        }
        state
            .push_stream
            .take()
            .ok_or_else(|| TransportError::PushUnavailable("already subscribed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{NewMessage, PushEvent};
    use futures::StreamExt;
    use std::time::Instant;

    #[tokio::test]
    async fn test_scripted_replies_are_fifo() {
        let notary = MockNotary::new();
        notary.push_reply(Ok(b"first".to_vec()));
        notary.push_reply(Ok(b"second".to_vec()));

        let request = NotaryRequest::Sign(b"m".to_vec());
        assert_eq!(notary.submit(&request).await.unwrap(), b"first".to_vec());
        assert_eq!(notary.submit(&request).await.unwrap(), b"second".to_vec());
    }

    #[tokio::test]
    async fn test_submit_without_script_fails() {
        let notary = MockNotary::new();
        let result = notary.submit(&NotaryRequest::Sign(vec![1])).await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }

    #[tokio::test]
    async fn test_submitted_envelopes_are_recorded() {
        let notary = MockNotary::new();
        notary.push_reply(Ok(Vec::new()));
        notary
            .submit(&NotaryRequest::Sign(b"hi".to_vec()))
            .await
            .unwrap();

        assert_eq!(notary.submitted(), vec![NotaryRequest::Sign(b"hi".to_vec())]);
        assert_eq!(notary.submitted_wire(), vec![r#"{"Sign":[104,105]}"#.to_string()]);
    }

    #[tokio::test]
    async fn test_delayed_reply_waits() {
        let notary = MockNotary::new();
        notary.push_delayed_reply(Ok(Vec::new()), Duration::from_millis(50));

        let start = Instant::now();
        notary
            .submit(&NotaryRequest::Sign(vec![0]))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_history_script() {
        let notary = MockNotary::new();
        assert!(matches!(
            notary.fetch_history().await,
            Err(TransportError::Status(404))
        ));

        notary.set_history(b"{}".to_vec());
        assert_eq!(notary.fetch_history().await.unwrap(), b"{}".to_vec());
    }

    #[tokio::test]
    async fn test_push_injection() {
        let notary = MockNotary::new();
        let mut stream = notary.subscribe().await.unwrap();

        let event = PushEvent::NewMessage(NewMessage {
            id: "bob.os".to_string(),
            author: "bob.os".to_string(),
            content: "hi".to_string(),
        });
        notary.push_handle().send(event.clone()).unwrap();

        assert_eq!(stream.next().await, Some(event));
    }

    #[tokio::test]
    async fn test_subscribe_failure_switch() {
        let notary = MockNotary::new();
        notary.fail_subscribe();

        assert!(matches!(
            notary.subscribe().await,
            Err(TransportError::PushUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_second_subscribe_fails() {
        let notary = MockNotary::new();
        let _stream = notary.subscribe().await.unwrap();

        assert!(matches!(
            notary.subscribe().await,
            Err(TransportError::PushUnavailable(_))
        ));
    }
}
