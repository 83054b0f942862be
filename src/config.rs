use std::path::Path;

use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// SQLite catalogue URL (e.g. sqlite://agri.db)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Enable rate limiting
    #[arg(long, env = "RATE_LIMIT_ENABLED")]
    pub rate_limit_enabled: Option<bool>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the chat page and the `/chat` endpoint (default)
    Serve,
    /// Chat with a running server from the terminal
    Chat {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub resilience: ResilienceConfig,
    pub persistence: PersistenceConfig,
    pub sessions: SessionsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory holding `index.html` and the widget assets.
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub rate_limit_enabled: bool,
    pub timeout_disabled: bool,
    pub requests_per_second: f32,
    pub burst_size: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersistenceConfig {
    pub database_url: String,
}

/// Limits of the in-memory conversation store.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionsConfig {
    /// Seconds without activity before a conversation is dropped.
    pub idle_timeout_secs: u64,
    /// Most conversations held at once.
    pub max_conversations: usize,
    /// Seconds between background sweeps of expired conversations.
    pub sweep_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
                static_dir: "static".to_string(),
            },
            resilience: ResilienceConfig {
                rate_limit_enabled: true,
                timeout_disabled: false,
                requests_per_second: 5.0,
                burst_size: 10.0,
            },
            persistence: PersistenceConfig {
                database_url: "sqlite://agri_data.db".to_string(),
            },
            sessions: SessionsConfig {
                idle_timeout_secs: 30 * 60,
                max_conversations: 10_000,
                sweep_interval_secs: 60,
            },
        }
    }
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Layer defaults, the config file, `AGRI_` env vars and CLI flags.
    ///
    /// Priority: CLI flag (or its env alias) > `AGRI_*` env > file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.static_dir", defaults.server.static_dir)?
            .set_default(
                "resilience.rate_limit_enabled",
                defaults.resilience.rate_limit_enabled,
            )?
            .set_default(
                "resilience.timeout_disabled",
                defaults.resilience.timeout_disabled,
            )?
            .set_default(
                "resilience.requests_per_second",
                f64::from(defaults.resilience.requests_per_second),
            )?
            .set_default(
                "resilience.burst_size",
                f64::from(defaults.resilience.burst_size),
            )?
            .set_default("persistence.database_url", defaults.persistence.database_url)?
            .set_default(
                "sessions.idle_timeout_secs",
                defaults.sessions.idle_timeout_secs,
            )?
            .set_default(
                "sessions.max_conversations",
                defaults.sessions.max_conversations as u64,
            )?
            .set_default(
                "sessions.sweep_interval_secs",
                defaults.sessions.sweep_interval_secs,
            )?;

        // 2. Config file: explicit path, else ./config.yaml when present
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config.yaml").required(false));
        }

        // 3. Environment, e.g. AGRI_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("AGRI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (clap already folded in PORT, DATABASE_URL, ...)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = &cli.database_url {
            builder = builder.set_override("persistence.database_url", url.as_str())?;
        }
        if let Some(rl) = cli.rate_limit_enabled {
            builder = builder.set_override("resilience.rate_limit_enabled", rl)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        builder.build()?.try_deserialize()
    }
}
