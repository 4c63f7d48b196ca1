//! HTTP + WebSocket transport for a live notary service.
//!
//! Request/response traffic goes over plain HTTP:
//! - `POST {api_url}/api` with a request envelope
//! - `GET {api_url}/messages` for the thread history
//!
//! The push channel is a websocket at `ws_url`; when no websocket URL is
//! configured it is derived from the HTTP endpoint (`http` -> `ws`).

use super::push::{PushSender, PushStream};
use super::traits::{Notary, TransportError, TransportResult};
use crate::wire::{self, NotaryRequest};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

/// Notary client over HTTP with a WebSocket push channel.
pub struct HttpNotary {
    client: reqwest::Client,
    api_url: String,
    ws_url: String,
}

impl HttpNotary {
    /// Create a client for the service at `api_url`. The push channel URL is
    /// derived from `api_url` unless given explicitly.
    pub fn new(api_url: impl Into<String>, ws_url: Option<String>) -> Self {
        let api_url = api_url.into();
        let ws_url = ws_url.unwrap_or_else(|| derive_ws_url(&api_url));
        Self {
            client: reqwest::Client::new(),
            api_url,
            ws_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }
}

/// Swap the URL scheme from HTTP to WebSocket (`https` -> `wss`).
fn derive_ws_url(api_url: &str) -> String {
    if let Some(rest) = api_url.strip_prefix("https") {
        format!("wss{}", rest)
    } else if let Some(rest) = api_url.strip_prefix("http") {
        format!("ws{}", rest)
    } else {
        api_url.to_string()
    }
}

#[async_trait]
impl Notary for HttpNotary {
    async fn submit(&self, request: &NotaryRequest) -> TransportResult<Vec<u8>> {
        let url = format!("{}/api", self.api_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(body.to_vec())
    }

    async fn fetch_history(&self) -> TransportResult<Vec<u8>> {
        let url = format!("{}/messages", self.api_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(body.to_vec())
    }

    async fn subscribe(&self) -> TransportResult<PushStream> {
        let (ws, _) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| TransportError::PushUnavailable(e.to_string()))?;

        let (stream, sender) = PushStream::channel();
        tokio::spawn(forward_frames(ws, sender));
        Ok(stream)
    }
}

/// Reader task for the push channel. Decodes text frames and forwards the
/// events; frames that are not recognized push envelopes are dropped.
async fn forward_frames(mut ws: WebSocketStream<MaybeTlsStream<TcpStream>>, sender: PushSender) {
    while let Some(frame) = ws.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Push channel error, closing: {}", e);
                break;
            }
        };

        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match wire::decode_push(&text) {
            Ok(event) => {
                if sender.send(event).is_err() {
                    break;
                }
            }
            Err(e) => debug!("Ignoring unrecognized push frame: {}", e),
        }
    }
}
