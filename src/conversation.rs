//! Per-visitor conversation logs.
//!
//! Each conversation keeps the exchanges answered by the chat endpoint so they
//! can be listed or cleared. Storage is in memory only and is lost on restart.
//! Idle conversations expire, and the store never holds more than its
//! capacity: when full, the least recently active conversation makes room.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::responder::Reply;

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub bot: String,
    /// Confidence as a percentage.
    pub score: f32,
    pub source: String,
    /// Local wall-clock time, `HH:MM`.
    pub timestamp: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, reply: &Reply) -> Self {
        Self {
            user: user.into(),
            bot: reply.response.clone(),
            score: reply.score(),
            source: reply.source.clone(),
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }
}

/// A single conversation. Cloning shares the underlying log.
#[derive(Debug, Clone)]
pub struct Conversation {
    inner: Arc<ConversationInner>,
}

#[derive(Debug)]
struct ConversationInner {
    id: String,
    exchanges: RwLock<Vec<Exchange>>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl Conversation {
    fn new(id: String) -> Self {
        Self {
            inner: Arc::new(ConversationInner {
                id,
                exchanges: RwLock::new(Vec::new()),
                last_activity: RwLock::new(Utc::now()),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn record(&self, exchange: Exchange) {
        self.inner
            .exchanges
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(exchange);
        self.touch();
    }

    #[must_use]
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.inner
            .exchanges
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .exchanges
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every exchange.
    pub fn reset(&self) {
        self.inner
            .exchanges
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.touch();
    }

    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether nothing happened in this conversation for longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        // A last activity in the future (clock skew) never expires.
        (Utc::now() - self.last_activity())
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    fn touch(&self) {
        *self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Utc::now();
    }
}

/// Idle time after which a conversation is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Most conversations held at once.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Thread-safe store of all conversations. Cloning shares the store.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    conversations: RwLock<HashMap<String, Conversation>>,
    idle_timeout: Duration,
    capacity: usize,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_CAPACITY)
    }
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose conversations expire after `idle_timeout` without
    /// activity and which holds at most `capacity` of them (at least one).
    #[must_use]
    pub fn with_limits(idle_timeout: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                conversations: RwLock::new(HashMap::new()),
                idle_timeout,
                capacity: capacity.max(1),
            }),
        }
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.inner.idle_timeout
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Create a conversation with a fresh id.
    pub fn create(&self) -> Conversation {
        self.insert(Uuid::new_v4().to_string())
    }

    /// Live conversation `id`. An expired one is dropped and not returned.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Conversation> {
        let conversation = self
            .inner
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()?;

        if conversation.is_expired_with_timeout(self.inner.idle_timeout) {
            self.remove(id);
            return None;
        }
        Some(conversation)
    }

    /// Look up `id`, or start a new conversation.
    ///
    /// An unknown id that is a valid UUID is reused (the client kept it across
    /// a server restart or its conversation expired); anything else gets a
    /// fresh id.
    pub fn get_or_create(&self, id: Option<&str>) -> Conversation {
        match id {
            Some(id) => match self.get(id) {
                Some(conversation) => conversation,
                None if Uuid::parse_str(id).is_ok() => self.insert(id.to_string()),
                None => self.create(),
            },
            None => self.create(),
        }
    }

    pub fn remove(&self, id: &str) -> Option<Conversation> {
        self.inner
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Drop every conversation idle for longer than the store's timeout.
    ///
    /// Returns the number of conversations removed.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_with_timeout(self.inner.idle_timeout)
    }

    /// Drop every conversation idle for longer than `timeout`.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self
            .inner
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, conversation| !conversation.is_expired_with_timeout(timeout));
        before - guard.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, id: String) -> Conversation {
        let mut guard = self
            .inner
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !guard.contains_key(&id) && guard.len() >= self.inner.capacity {
            let timeout = self.inner.idle_timeout;
            guard.retain(|_, conversation| !conversation.is_expired_with_timeout(timeout));

            if guard.len() >= self.inner.capacity {
                let oldest = guard
                    .values()
                    .min_by_key(|conversation| conversation.last_activity())
                    .map(|conversation| conversation.id().to_string());
                if let Some(oldest) = oldest {
                    guard.remove(&oldest);
                    tracing::debug!(
                        name: "conversation.evicted",
                        session_id = %oldest,
                        "Store full; least recently active conversation dropped"
                    );
                }
            }
        }

        guard
            .entry(id.clone())
            .or_insert_with(|| Conversation::new(id))
            .clone()
    }
}
