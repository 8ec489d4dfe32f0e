use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub password: FilePasswordConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePasswordConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_kib: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub auth_token_secret: Option<String>,
    pub auth_token_ttl_secs: Option<u64>,
    pub password_memory_kib: Option<u32>,
    pub password_iterations: Option<u32>,
    pub password_parallelism: Option<u32>,
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self::default();

        env_config.server_host = std::env::var("SERVER_HOST").ok();
        env_config.server_port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok());
        env_config.database_url = std::env::var("DATABASE_URL").ok();
        env_config.auth_token_secret = std::env::var("AUTH_TOKEN_SECRET").ok();
        env_config.auth_token_ttl_secs = std::env::var("AUTH_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok());
        env_config.password_memory_kib = std::env::var("PASSWORD_MEMORY_KIB")
            .ok()
            .and_then(|s| s.parse().ok());
        env_config.password_iterations = std::env::var("PASSWORD_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok());
        env_config.password_parallelism = std::env::var("PASSWORD_PARALLELISM")
            .ok()
            .and_then(|s| s.parse().ok());
        env_config.config_path =
            std::env::var("ANNUAIRE_CONFIG").ok().map(PathBuf::from);

        env_config
    }
}
