//! Agricultural chat assistant.
//!
//! A chat widget that posts user questions to a `/chat` endpoint and renders
//! the answers with clickable follow-up suggestions, plus the server that
//! answers them from an agricultural catalogue.
//!
//! # Architecture
//!
//! - **Widget**: view-agnostic controller with an explicit single-flight guard;
//!   the browser page and the terminal front end are two views of it
//! - **Server**: Axum HTTP server serving the page and the chat API
//! - **Responder**: keyword-driven answer engine
//! - **Catalogue**: SQLite store of crops, planting periods and soils
//!
//! # Modules
//!
//! - [`widget`]: chat controller, markup and transport
//! - [`console`]: terminal view and loop
//! - [`server`]: router and handlers
//! - [`responder`]: answers and suggestions
//! - [`catalogue`]: reference data store
//! - [`conversation`]: per-visitor exchange logs

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod catalogue;
pub mod config;
pub mod console;
pub mod conversation;
pub mod resilience;
pub mod responder;
pub mod server;
pub mod widget;

use std::sync::Arc;
use std::time::Duration;

use catalogue::CatalogueStore;
use config::AppConfig;
use conversation::ConversationStore;
use resilience::SimpleRateLimiter;
use responder::Responder;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Answer engine.
    pub responder: Arc<Responder>,
    /// Per-visitor exchange logs.
    pub conversations: ConversationStore,
    /// Global Rate Limiter
    pub rate_limiter: Arc<SimpleRateLimiter>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, catalogue: Arc<dyn CatalogueStore>) -> Self {
        let rate_limiter = Arc::new(SimpleRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        ));
        Self {
            responder: Arc::new(Responder::new(catalogue)),
            conversations: ConversationStore::with_limits(
                Duration::from_secs(config.sessions.idle_timeout_secs),
                config.sessions.max_conversations,
            ),
            rate_limiter,
            config,
        }
    }
}
