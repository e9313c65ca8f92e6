//! Server settings.
//!
//! Layered the usual way: built-in defaults, then an optional `config.toml`
//! in the working directory, then environment variables where `_` separates
//! the section from the key (`DATABASE_HOST`, `SERVER_PORT`, `STORAGE_BACKEND`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub database: String,
    /// Maximum pool connections.
    pub pool: u32,
}

impl Database {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

impl Default for Database {
    fn default() -> Self {
        Self {
            user: "notebook".into(),
            password: "password".into(),
            host: "localhost".into(),
            port: "5432".into(),
            database: "notebook".into(),
            pool: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Inactivity expiry in days.
    pub days: i64,
    /// Only send the cookie over HTTPS.
    pub secure: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            days: 7,
            secure: false,
        }
    }
}

/// Where users, documents and sessions live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub backend: Backend,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub server: Server,
    pub session: Session,
    pub storage: Storage,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database.user", "notebook")?
            .set_default("database.password", "password")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", "5432")?
            .set_default("database.database", "notebook")?
            .set_default("database.pool", 5)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("session.days", 7)?
            .set_default("session.secure", false)?
            .set_default("storage.backend", "postgres")?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}
