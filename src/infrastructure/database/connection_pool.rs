use crate::shared::error::AppError;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::sync::Arc;

/// The single durable-store connection, opened once and shared for the
/// process lifetime. Open or migration failure means no durable
/// queuing; callers degrade to online-only submission.
#[derive(Clone)]
pub struct ConnectionPool {
    pool: Arc<SqlitePool>,
}

impl ConnectionPool {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|err| AppError::StorageUnavailable(err.to_string()))?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub async fn from_memory() -> Result<Self, AppError> {
        // In-memory SQLite is per-connection; a single connection keeps
        // every statement on the same database.
        Self::new("sqlite::memory:", 1).await
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|err| AppError::StorageUnavailable(err.to_string()))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
