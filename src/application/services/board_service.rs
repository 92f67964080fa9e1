use crate::application::ports::connectivity::NetworkStatus;
use crate::application::ports::job_gateway::JobGateway;
use crate::application::ports::offline_store::OfflineStore;
use crate::domain::value_objects::CacheKey;
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

const JOBS_CACHE_KEY: &str = "jobs";

/// A job list for the board, live or from the offline snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub jobs: Value,
    pub fetched_live: bool,
    /// Set only for snapshot data; the shell shows it as staleness.
    pub cached_at: Option<DateTime<Utc>>,
}

/// Keeps the kanban board usable offline: every live fetch refreshes
/// the cached snapshot, and the snapshot answers when the backend
/// cannot.
pub struct BoardService {
    gateway: Arc<dyn JobGateway>,
    network: Arc<dyn NetworkStatus>,
    store: Option<Arc<dyn OfflineStore>>,
}

impl BoardService {
    pub fn new(
        gateway: Arc<dyn JobGateway>,
        network: Arc<dyn NetworkStatus>,
        store: Option<Arc<dyn OfflineStore>>,
    ) -> Self {
        Self {
            gateway,
            network,
            store,
        }
    }

    /// Fetch the live job list and refresh the snapshot.
    pub async fn refresh(&self) -> Result<Value, AppError> {
        let jobs = self.gateway.fetch_jobs().await?;
        if let Some(store) = &self.store {
            store.cache_put(self.cache_key()?, jobs.clone()).await?;
        }
        Ok(jobs)
    }

    /// Live list when possible, cached snapshot otherwise.
    pub async fn load(&self) -> Result<BoardSnapshot, AppError> {
        if self.network.is_online() {
            match self.refresh().await {
                Ok(jobs) => {
                    return Ok(BoardSnapshot {
                        jobs,
                        fetched_live: true,
                        cached_at: None,
                    });
                }
                Err(err) => warn!("Live job list unavailable, falling back to snapshot: {err}"),
            }
        }

        let store = self.store.as_ref().ok_or_else(|| {
            AppError::StorageUnavailable("no snapshot cache available".to_string())
        })?;

        let entry = store
            .cache_get(&self.cache_key()?)
            .await?
            .ok_or_else(|| AppError::NotFound("No cached job list".to_string()))?;

        Ok(BoardSnapshot {
            jobs: entry.data,
            fetched_live: false,
            cached_at: Some(entry.cached_at),
        })
    }

    fn cache_key(&self) -> Result<CacheKey, AppError> {
        CacheKey::new(JOBS_CACHE_KEY.to_string()).map_err(AppError::Internal)
    }
}
