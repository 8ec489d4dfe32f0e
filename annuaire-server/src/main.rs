//! # Annuaire Server
//!
//! Self-service staff directory API.
//!
//! ## Overview
//!
//! Annuaire exposes a small HTTP API for managing user profiles:
//!
//! - **Authentication**: Bearer tokens (HS256) issued at login
//! - **Profile Management**: Users read and edit their own record
//! - **Persistence**: PostgreSQL with embedded migrations
//!
//! The binary loads configuration, connects to PostgreSQL, applies
//! migrations, and serves the router from [`annuaire_server::routes`].

use annuaire_core::{
    MIGRATOR, crypto::PasswordHasher, store::PostgresUserStore,
};
use annuaire_server::{
    auth::token::TokenService,
    infra::{
        app_state::AppState,
        config::{Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions},
    },
    routes::create_app,
};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "annuaire-server")]
#[command(about = "Self-service staff directory API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Debug, ClapArgs)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Path to a configuration file (overrides discovery)
    #[arg(long, env = "ANNUAIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when omitted)
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Command::Db(DbCommand::Migrate) => {
                run_db_migrate(&cli.serve).await?;
                return Ok(());
            }
        }
    }

    run_server(cli.serve).await
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let pool = connect(&config).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let loader = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: args.config.clone(),
        env_file: args.env_file.clone(),
    });
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Quieter defaults. Override via RUST_LOG.
                    "info,tower_http=warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }

    if !warnings.is_empty() {
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => {
                    warn!(message = %warning.message, hint = %hint, "configuration warning")
                }
                None => {
                    warn!(message = %warning.message, "configuration warning")
                }
            }
        }
    }

    Ok(config)
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config.database.url.clone().ok_or_else(|| {
        error!("DATABASE_URL must be provided for PostgreSQL connections");
        anyhow::anyhow!("No PostgreSQL connection configuration found")
    })?;

    if !(database_url.starts_with("postgres://")
        || database_url.starts_with("postgresql://"))
    {
        error!("Only PostgreSQL database URLs are supported");
        return Err(anyhow::anyhow!(
            "Invalid database URL: must start with postgres:// or postgresql://"
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("Connected to PostgreSQL");
    Ok(pool)
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(&args)?;

    let token_secret = config.auth.token_secret.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "AUTH_TOKEN_SECRET must be provided to issue and validate tokens"
        )
    })?;

    let pool = connect(&config).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;
    info!("Database schema up to date");

    let hasher = PasswordHasher::new(&config.password)
        .context("invalid password hashing parameters")?;
    let tokens = TokenService::new(&token_secret, config.auth.token_ttl_secs);

    let state = AppState {
        store: Arc::new(PostgresUserStore::new(pool)),
        hasher: Arc::new(hasher),
        tokens: Arc::new(tokens),
    };

    let app = create_app(state);

    let addr: SocketAddr =
        format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .context("invalid server address")?;
    info!("Starting Annuaire server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to install shutdown signal handler: {err}");
    }
}
