pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use taskpad_core::task::{CreateTask, Task, TaskFilter, UpdateTask};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Internal(String),
}

/// Storage contract shared by the durable and transient backends.
///
/// Observable behavior is part of the contract: both implementations
/// must agree on filtering semantics, sort order, and tie-breaking.
/// The contract suite in `tests/common` runs against each of them.
#[async_trait]
pub trait Database: Send + Sync {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DbError>;
    async fn get_task(&self, id: &str) -> Result<Task, DbError>;
    async fn create_task(&self, input: &CreateTask) -> Result<Task, DbError>;
    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<Task, DbError>;
    async fn delete_task(&self, id: &str) -> Result<(), DbError>;
}

/// Connection settings, read once at startup.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Postgres URL. `None` selects the in-memory store outright.
    pub database_url: Option<String>,
    /// Upper bound on the startup connection attempt.
    pub connect_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Select the backing store for the lifetime of the process.
///
/// When a database URL is configured, attempt the durable store; if the
/// connection does not succeed within `connect_timeout`, fall back to
/// the transient in-memory store. The choice is made exactly once and
/// never revisited per request.
pub async fn connect(config: &DbConfig) -> Arc<dyn Database> {
    #[cfg(feature = "postgres")]
    if let Some(url) = config.database_url.as_deref() {
        match tokio::time::timeout(
            config.connect_timeout,
            postgres::PostgresDatabase::connect(url),
        )
        .await
        {
            Ok(Ok(db)) => {
                tracing::info!("connected to postgres");
                return Arc::new(db);
            }
            Ok(Err(e)) => {
                tracing::warn!("postgres connection failed: {e}; using in-memory storage");
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = config.connect_timeout.as_secs(),
                    "postgres connection timed out; using in-memory storage"
                );
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    if config.database_url.is_some() {
        tracing::warn!("built without postgres support; using in-memory storage");
    }

    Arc::new(memory::MemoryDatabase::new())
}
