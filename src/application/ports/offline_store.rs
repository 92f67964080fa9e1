use crate::domain::entities::{CacheEntry, PendingJob, PendingJobPatch};
use crate::domain::value_objects::{CacheKey, JobFields, LocalId, PendingStatus};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Durable store port: the pending-submission set and the snapshot
/// cache, both owned by one storage adapter. All mutation goes through
/// here; no component keeps a second copy as source of truth.
#[async_trait]
pub trait OfflineStore: Send + Sync {
    /// Insert a new pending record (status `pending`, zero attempts).
    /// Fires the pending-count badge.
    async fn add_pending(&self, fields: JobFields) -> Result<PendingJob, AppError>;

    /// All records with the given status, in store iteration order.
    async fn list_by_status(&self, status: PendingStatus) -> Result<Vec<PendingJob>, AppError>;

    async fn count_by_status(&self, status: PendingStatus) -> Result<u32, AppError>;

    /// Shallow-merge `patch` into the record. `NotFound` if the id does
    /// not exist.
    async fn update_pending(
        &self,
        local_id: LocalId,
        patch: PendingJobPatch,
    ) -> Result<PendingJob, AppError>;

    /// Failure bookkeeping for one sync attempt: status back to
    /// `pending`, attempts incremented, `last_error` overwritten, any
    /// transient reservation cleared.
    async fn record_failure(
        &self,
        local_id: LocalId,
        message: &str,
    ) -> Result<PendingJob, AppError>;

    /// Idempotent delete. Fires the pending-count badge.
    async fn remove_pending(&self, local_id: LocalId) -> Result<(), AppError>;

    /// Reset records left in `syncing` by an interrupted drain back to
    /// `pending`. Returns how many were reset.
    async fn recover_interrupted(&self) -> Result<u32, AppError>;

    async fn cache_put(&self, key: CacheKey, data: Value) -> Result<(), AppError>;

    async fn cache_get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, AppError>;
}
