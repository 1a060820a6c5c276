use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// Environment variable prefix. `AGENCIA__SERVER__PORT=9000` sets `server.port`.
pub const ENV_PREFIX: &str = "AGENCIA";
pub const DEFAULT_LOG_FILTER: &str = "agencia=info,tower_http=info";

/// Which repository implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Mongo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongodb_uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Seed sample flights and passengers into an empty store on startup.
    pub demo_mode: bool,
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from defaults, then a TOML file, then the environment.
    ///
    /// With no explicit `path`, an `agencia.toml` in the working directory is
    /// read if present. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("agencia").required(false),
        };

        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.mongodb_uri", "mongodb://localhost:27017")?
            .set_default("storage.database", "agencia")?
            .set_default("demo_mode", false)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(file)
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
