//! Handles settings for the application.
//!
//! Sources are layered, later ones winning:
//!
//! 1. built-in defaults,
//! 2. `settings.toml` in the working directory, or the file named by
//!    `LEDGERLY_CONFIG`, if present,
//! 3. `LEDGERLY__SECTION__KEY` environment variables, e.g.
//!    `LEDGERLY__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    /// IANA zone name, e.g. `Europe/Rome`.
    pub timezone: String,
    pub export_dir: String,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub operation_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let file = std::env::var("LEDGERLY_CONFIG").unwrap_or_else(|_| "settings".to_string());

        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.timezone", "UTC")?
            .set_default("server.export_dir", ".")?
            .set_default("server.default_page_size", 20)?
            .set_default("server.max_page_size", 500)?
            .set_default("database.url", "sqlite:./ledgerly.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("database.operation_timeout_secs", 10)?
            .add_source(File::with_name(&file).required(false))
            .add_source(
                Environment::with_prefix("LEDGERLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
