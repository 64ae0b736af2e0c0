//! Superlists Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - services: Validation and persistence workflows
//! - http: Axum routes, handlers and middleware

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

pub mod cli;
pub mod config;
pub mod domain;
pub mod http;
pub mod repository;
pub mod services;

pub use config::{ConfigError, ServerConfig};
pub use http::build_router;

use repository::{init_db, DbState};
use services::ListService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub lists: Arc<ListService>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Open and migrate the configured database
    pub fn open(config: ServerConfig) -> anyhow::Result<Self> {
        let db = init_db(&config.database)
            .with_context(|| format!("opening database {}", config.database.display()))?;
        Ok(Self::with_db(db, config))
    }

    pub fn with_db(db: DbState, config: ServerConfig) -> Self {
        Self {
            lists: Arc::new(ListService::new(&db)),
            db,
            config: Arc::new(config),
        }
    }
}

/// Serve until Ctrl-C on an already bound listener
pub async fn serve_on(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("reading listener address")?;
    tracing::info!(%addr, debug = state.config.debug, "serving superlists");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

/// Validate `config`, migrate the database and serve HTTP
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    let state = AppState::open(config)?;
    serve_on(listener, state).await
}

/// Create or upgrade the schema of the database at `database`
pub fn run_migrations(database: &Path) -> anyhow::Result<()> {
    repository::migrate(database)
        .with_context(|| format!("migrating {}", database.display()))?;
    tracing::info!(database = %database.display(), "migrations applied");
    Ok(())
}

/// Write every bundled asset into `destination`, returning how many
pub fn collect_static(destination: &Path) -> anyhow::Result<usize> {
    std::fs::create_dir_all(destination)
        .with_context(|| format!("creating {}", destination.display()))?;
    for (name, contents) in superlists_ui::assets::ASSETS {
        let target = destination.join(name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&target, contents)
            .with_context(|| format!("writing {}", target.display()))?;
    }
    let count = superlists_ui::assets::ASSETS.len();
    tracing::info!(count, destination = %destination.display(), "static files collected");
    Ok(count)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
