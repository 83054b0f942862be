//! Chat endpoint transport.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message content.
    pub message: String,
    /// Conversation to append to, when the server handed one out earlier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// The part of the chat response the widget cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatReply {
    pub fn new(response: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            response: response.into(),
            suggestions,
            session_id: None,
        }
    }
}

/// A failed chat request.
///
/// The controller treats every variant the same way.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Connection, body or JSON decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Sends one message and waits for the reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatReply, ChatError>;
}

/// `reqwest`-backed transport posting JSON to `{base_url}/chat`.
///
/// No timeout and no retry: a hung request stays pending until the
/// connection settles.
#[derive(Debug)]
pub struct HttpTransport {
    endpoint: Url,
    http: reqwest::Client,
    session_id: Mutex<Option<String>>,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ChatError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self, ChatError> {
        let endpoint = Url::parse(base_url.as_ref())?.join("/chat")?;
        Ok(Self {
            endpoint,
            http,
            session_id: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Conversation id returned by the last successful reply.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, message: &str) -> Result<ChatReply, ChatError> {
        let body = ChatRequest {
            message: message.to_string(),
            session_id: self.session_id(),
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatReply = response.json().await?;
        debug!(
            name: "widget.reply.received",
            suggestions = reply.suggestions.len(),
            "Chat reply received"
        );

        if let Some(id) = &reply.session_id {
            *self
                .session_id
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(id.clone());
        }
        Ok(reply)
    }
}
