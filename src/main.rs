//! Agricultural chat assistant.
//!
//! `agri-chat` (or `agri-chat serve`) runs the server; `agri-chat chat` opens
//! the terminal front end against a running server.

use std::sync::Arc;

use agri_chat::config::{AppConfig, Cli, Command};
use agri_chat::{console, server};
use clap::Parser;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::start_server(Arc::new(config)).await,
        Command::Chat { url } => console::run_stdio(&url).await,
    }
}

/// Structured logging to stderr (M-LOG-STRUCTURED); `LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
