use super::mappers::{cache_entry_from_row, pending_job_from_row};
use super::rows::{CacheEntryRow, PendingJobRow};
use crate::application::ports::notifier::SyncNotifier;
use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::{CacheEntry, PendingJob, PendingJobPatch};
use crate::domain::value_objects::{CacheKey, JobFields, LocalId, PendingStatus};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};
use std::sync::Arc;
use tracing::{debug, warn};

/// SQLite-backed durable store for the pending queue and the snapshot
/// cache. Badge updates on add/remove go through the notifier port.
pub struct SqliteOfflineStore {
    pool: Pool<Sqlite>,
    notifier: Arc<dyn SyncNotifier>,
}

impl SqliteOfflineStore {
    pub fn new(pool: Pool<Sqlite>, notifier: Arc<dyn SyncNotifier>) -> Self {
        Self { pool, notifier }
    }

    async fn fetch_pending(&self, local_id: LocalId) -> Result<Option<PendingJob>, AppError> {
        let row = sqlx::query_as::<_, PendingJobRow>(
            "SELECT * FROM pending_jobs WHERE local_id = ?1",
        )
        .bind(local_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(pending_job_from_row).transpose()
    }

    async fn emit_pending_count(&self) -> Result<(), AppError> {
        let count = self.count_by_status(PendingStatus::Pending).await?;
        self.notifier.pending_count_changed(count);
        Ok(())
    }
}

#[async_trait]
impl OfflineStore for SqliteOfflineStore {
    async fn add_pending(&self, fields: JobFields) -> Result<PendingJob, AppError> {
        let job_data = serde_json::to_string(fields.as_json())?;
        let created_at = Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO pending_jobs (job_data, status, created_at, attempts)
            VALUES (?1, 'pending', ?2, 0)
            "#,
        )
        .bind(&job_data)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        let local_id = LocalId::new(result.last_insert_rowid()).map_err(AppError::Database)?;
        debug!("Queued pending job with local id {local_id}");

        let job = self
            .fetch_pending(local_id)
            .await?
            .ok_or_else(|| AppError::Database("Inserted row vanished".to_string()))?;

        self.emit_pending_count().await?;
        Ok(job)
    }

    async fn list_by_status(&self, status: PendingStatus) -> Result<Vec<PendingJob>, AppError> {
        let rows = sqlx::query_as::<_, PendingJobRow>(
            "SELECT * FROM pending_jobs WHERE status = ?1",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(pending_job_from_row).collect()
    }

    async fn count_by_status(&self, status: PendingStatus) -> Result<u32, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM pending_jobs WHERE status = ?1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = result.try_get("count").unwrap_or(0);
        Ok(count.max(0) as u32)
    }

    async fn update_pending(
        &self,
        local_id: LocalId,
        patch: PendingJobPatch,
    ) -> Result<PendingJob, AppError> {
        let mut job = self
            .fetch_pending(local_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No pending job with local id {local_id}")))?;

        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(attempts) = patch.attempts {
            job.attempts = attempts;
        }
        if let Some(message) = patch.last_error {
            job.last_error = Some(message);
        }
        if let Some(reserved) = patch.reserved_job_id {
            job.reserved_job_id = reserved;
        }

        sqlx::query(
            r#"
            UPDATE pending_jobs
            SET status = ?1, attempts = ?2, last_error = ?3, reserved_job_id = ?4
            WHERE local_id = ?5
            "#,
        )
        .bind(job.status.as_str())
        .bind(job.attempts as i64)
        .bind(&job.last_error)
        .bind(job.reserved_job_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(local_id.value())
        .execute(&self.pool)
        .await?;

        Ok(job)
    }

    async fn record_failure(
        &self,
        local_id: LocalId,
        message: &str,
    ) -> Result<PendingJob, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE pending_jobs
            SET status = 'pending',
                attempts = attempts + 1,
                last_error = ?2,
                reserved_job_id = NULL
            WHERE local_id = ?1
            "#,
        )
        .bind(local_id.value())
        .bind(message)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No pending job with local id {local_id}"
            )));
        }

        self.fetch_pending(local_id)
            .await?
            .ok_or_else(|| AppError::Database("Updated row vanished".to_string()))
    }

    async fn remove_pending(&self, local_id: LocalId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM pending_jobs WHERE local_id = ?1")
            .bind(local_id.value())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!("Deleted pending job {local_id}");
        }

        self.emit_pending_count().await?;
        Ok(())
    }

    async fn recover_interrupted(&self) -> Result<u32, AppError> {
        let result =
            sqlx::query("UPDATE pending_jobs SET status = 'pending' WHERE status = 'syncing'")
                .execute(&self.pool)
                .await?;

        let recovered = result.rows_affected() as u32;
        if recovered > 0 {
            warn!("Recovered {recovered} submission(s) interrupted mid-sync");
        }
        Ok(recovered)
    }

    async fn cache_put(&self, key: CacheKey, data: serde_json::Value) -> Result<(), AppError> {
        let payload = serde_json::to_string(&data)?;
        let cached_at = Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO data_cache (cache_key, data, cached_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(cache_key) DO UPDATE SET
                data = excluded.data,
                cached_at = excluded.cached_at
            "#,
        )
        .bind(key.as_str())
        .bind(&payload)
        .bind(cached_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn cache_get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, AppError> {
        let row = sqlx::query_as::<_, CacheEntryRow>(
            "SELECT * FROM data_cache WHERE cache_key = ?1",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(cache_entry_from_row).transpose()
    }
}
