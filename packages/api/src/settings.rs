//! # Settings: layered startup configuration
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. built-in defaults,
//! 2. an optional `config.toml` in the working directory,
//! 3. environment variables split on `_` (`DATABASE_URL` → `database.url`,
//!    `SERVER_PORT` → `server.port`),
//! 4. `LOGBOOK_`-prefixed variables (`LOGBOOK_STORE_KEY` → `store.key`).
//!
//! The session signing secret has no default: [`Settings::new`] fails when it is
//! missing, and the binary treats that as fatal.

use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Database {
    /// Full connection string; takes precedence over the individual fields.
    pub url: Option<String>,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl Database {
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ if self.password.is_empty() => format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.name
            ),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Mark the session cookie `Secure`; enable behind HTTPS.
    pub secure: bool,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Store {
    /// Secret the session cookie is signed with.
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub server: Server,
    pub store: Store,
}

impl Settings {
    /// Load settings from the process environment (and `.env`).
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(None)
    }

    /// Load settings with `vars` standing in for the process environment.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.name", "logbook")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8006)?
            .set_default("server.secure", false)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_").source(vars.clone()))
            .add_source(
                Environment::with_prefix("LOGBOOK")
                    .separator("_")
                    .source(vars),
            )
            .build()?
            .try_deserialize()?;

        match settings.store.key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(settings),
            _ => Err(ConfigError::NotFound(
                "LOGBOOK_STORE_KEY is not set".to_string(),
            )),
        }
    }

    /// The session signing secret. Present once [`Settings::new`] succeeded.
    pub fn store_key(&self) -> &str {
        self.store.key.as_deref().unwrap_or_default()
    }
}
