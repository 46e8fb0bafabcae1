//! Cocktail Server - REST API for cocktail recipes with token-gated user management

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use cocktail_api::{AppState, create_router};
use cocktail_auth::{CredentialVerifier, JwtManager, hash_password};
use cocktail_db::{Database, NewUser};
use config::{BootstrapConfig, Config};

/// Cocktail Server - REST API for cocktail recipes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "SERVER_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Token signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Token lifetime ("3600", "30m", "1h", ...)
    #[arg(long, env = "JWT_DURING")]
    jwt_during: Option<String>,

    /// Argon2 time cost for password hashes
    #[arg(long, env = "HASH_COST")]
    hash_cost: Option<u32>,

    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

impl Args {
    /// Command line and environment values win over the file
    fn apply(self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(secret) = self.jwt_secret {
            config.auth.jwt_secret = secret;
        }
        if let Some(during) = self.jwt_during {
            config.auth.jwt_during = during;
        }
        if let Some(cost) = self.hash_cost {
            config.auth.hash_cost = cost;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    info!("Starting Cocktail Server v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    // Create the database directory for file-backed SQLite
    let db_dir = sqlite_file_path(&config.database.url)
        .and_then(|path| path.parent().map(PathBuf::from))
        .filter(|dir| !dir.as_os_str().is_empty());
    if let Some(parent) = db_dir {
        tokio::fs::create_dir_all(&parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // Initialize database
    let db = Database::new(&config.database.url, config.database.max_connections).await?;

    // Seed the configured first account if no users exist
    if let Some(bootstrap) = &config.bootstrap {
        seed_bootstrap_user(&db, bootstrap, config.auth.hash_cost).await?;
    }

    // Initialize token manager and credential verifier
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.token_lifetime()?,
    )?);
    let verifier = Arc::new(CredentialVerifier::new(
        Arc::new(db.clone()),
        config.auth.hash_cost,
    )?);

    // Create application state
    let state = AppState::new(db, jwt, verifier, config.auth.hash_cost);

    // Create router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Determine bind address
    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);
    info!("Token lifetime: {}", config.auth.jwt_during);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Create the bootstrap account when the users table has no active row
async fn seed_bootstrap_user(db: &Database, bootstrap: &BootstrapConfig, hash_cost: u32) -> Result<()> {
    if db.has_users().await? {
        return Ok(());
    }

    info!("Creating bootstrap user {}", bootstrap.email);
    let password_hash = hash_password(&bootstrap.password, hash_cost)?;
    db.insert_user(NewUser {
        nom: bootstrap.nom.clone(),
        prenom: bootstrap.prenom.clone(),
        pseudo: bootstrap.pseudo.clone(),
        email: bootstrap.email.clone(),
        password_hash,
    })
    .await?;
    warn!("Bootstrap user created; change its password");
    Ok(())
}

/// File path behind a `sqlite:` URL, or None for in-memory databases
fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
