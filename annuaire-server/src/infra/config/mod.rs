//! Layered configuration: defaults, then an optional TOML file, then
//! environment variables, with CLI flags applied last by the binary.

pub mod loader;
pub mod models;
pub mod sources;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions, ConfigWarning,
    ConfigWarnings,
};
pub use models::{AuthConfig, Config, ConfigMetadata, DatabaseConfig, ServerConfig};
pub use sources::{EnvConfig, FileConfig};
