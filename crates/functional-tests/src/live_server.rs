//! Server under test
//!
//! With `STAGING_SERVER` set, checks run against `http://{STAGING_SERVER}`.
//! Otherwise the application is started in-process on an ephemeral port
//! with a throwaway database.

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use superlists_lib::{serve_on, AppState, ServerConfig};

use crate::wait::{CheckError, CheckResult};

pub const STAGING_SERVER_VAR: &str = "STAGING_SERVER";

pub struct LiveServer {
    url: String,
    staging: bool,
    task: Option<JoinHandle<()>>,
    _data: Option<TempDir>,
}

impl LiveServer {
    pub async fn start() -> CheckResult<Self> {
        match std::env::var(STAGING_SERVER_VAR) {
            Ok(host) if !host.trim().is_empty() => Ok(Self::staging(host.trim())),
            _ => Self::spawn().await,
        }
    }

    pub fn staging(host: &str) -> Self {
        tracing::info!(%host, "using staging server");
        Self {
            url: format!("http://{host}"),
            staging: true,
            task: None,
            _data: None,
        }
    }

    /// Start the application on `127.0.0.1:0` with a fresh database
    pub async fn spawn() -> CheckResult<Self> {
        let data = tempfile::tempdir().map_err(|e| CheckError::Setup(e.to_string()))?;
        let config = ServerConfig {
            database: data.path().join("db.sqlite3"),
            static_root: data.path().join("static"),
            ..Default::default()
        };
        let state = AppState::open(config).map_err(|e| CheckError::Setup(format!("{e:#}")))?;
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| CheckError::Setup(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| CheckError::Setup(e.to_string()))?;
        let task = tokio::spawn(async move {
            if let Err(e) = serve_on(listener, state).await {
                tracing::error!(error = %e, "live server stopped");
            }
        });
        Ok(Self {
            url: format!("http://{addr}"),
            staging: false,
            task: Some(task),
            _data: Some(data),
        })
    }

    /// Base URL without a trailing slash
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_staging(&self) -> bool {
        self.staging
    }
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
