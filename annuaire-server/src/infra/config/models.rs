//! Fully-resolved runtime configuration.

use std::path::PathBuf;

use annuaire_core::crypto::HashParams;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub password: HashParams,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret. Serving requires one; `db migrate` does not.
    pub token_secret: Option<String>,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
