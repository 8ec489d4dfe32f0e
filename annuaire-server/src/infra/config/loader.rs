use std::{fs, path::PathBuf};
use thiserror::Error;

use annuaire_core::crypto::HashParams;

use super::{
    models::{AuthConfig, Config, ConfigMetadata, DatabaseConfig, ServerConfig},
    sources::{EnvConfig, FileConfig},
};

const DEFAULT_CONFIG_LOCATIONS: &[&str] = &["annuaire.toml", "config/annuaire.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => {
                dotenvy::from_path(path).map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        let env_config = EnvConfig::gather();

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) = self.compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        );

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        }

        if source.is_empty() {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists());
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents = fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
            path: path.clone(),
            source: err,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> (Config, ConfigWarnings) {
        let mut warnings = ConfigWarnings::default();

        if file_config.is_none() {
            warnings.push_with_hint(
                "No annuaire.toml detected; falling back to environment variables",
                "Pass --config or place annuaire.toml next to the binary",
            );
        }

        let FileConfig {
            server: file_server,
            database: file_database,
            auth: file_auth,
            password: file_password,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .or(file_server.host)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(3000),
        };

        let database = DatabaseConfig {
            url: env
                .database_url
                .or(file_database.url)
                .filter(|value| !value.trim().is_empty()),
        };

        if database.url.is_none() {
            warnings.push_with_hint(
                "No database URL configured",
                "Set DATABASE_URL or [database].url in annuaire.toml",
            );
        }

        let auth = AuthConfig {
            token_secret: env
                .auth_token_secret
                .or(file_auth.token_secret)
                .filter(|value| !value.trim().is_empty()),
            token_ttl_secs: env
                .auth_token_ttl_secs
                .or(file_auth.token_ttl_secs)
                .unwrap_or(86_400),
        };

        if auth.token_secret.is_none() {
            warnings.push("AUTH_TOKEN_SECRET is not set; the server cannot issue or validate tokens");
        }

        let defaults = HashParams::default();
        let password = HashParams {
            memory_kib: env
                .password_memory_kib
                .or(file_password.memory_kib)
                .unwrap_or(defaults.memory_kib),
            iterations: env
                .password_iterations
                .or(file_password.iterations)
                .unwrap_or(defaults.iterations),
            parallelism: env
                .password_parallelism
                .or(file_password.parallelism)
                .unwrap_or(defaults.parallelism),
        };

        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded,
        };

        let config = Config {
            server,
            database,
            auth,
            password,
            metadata,
        };

        (config, warnings)
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn is_empty(&self) -> bool {
        self.explicit.is_none() && self.env.is_none() && self.default.is_none()
    }

    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

/// Non-fatal findings surfaced while composing the configuration.
#[derive(Debug, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

#[derive(Debug)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl ConfigWarnings {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    fn push_with_hint(&mut self, message: impl Into<String>, hint: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
