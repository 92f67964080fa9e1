use super::rows::{CacheEntryRow, PendingJobRow};
use crate::domain::entities::{CacheEntry, PendingJob};
use crate::domain::value_objects::{CacheKey, JobFields, JobId, LocalId, PendingStatus};
use crate::shared::error::AppError;
use chrono::DateTime;

pub fn pending_job_from_row(row: PendingJobRow) -> Result<PendingJob, AppError> {
    let local_id = LocalId::new(row.local_id).map_err(AppError::Database)?;
    let fields = JobFields::from_json_str(&row.job_data).map_err(AppError::Database)?;
    let status = PendingStatus::from(row.status.as_str());
    let created_at = DateTime::from_timestamp(row.created_at, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid created_at: {}", row.created_at)))?;
    let reserved_job_id = row
        .reserved_job_id
        .map(JobId::new)
        .transpose()
        .map_err(AppError::Database)?;

    Ok(PendingJob::new(
        local_id,
        fields,
        status,
        created_at,
        row.attempts.max(0) as u32,
        row.last_error,
        reserved_job_id,
    ))
}

pub fn cache_entry_from_row(row: CacheEntryRow) -> Result<CacheEntry, AppError> {
    let key = CacheKey::new(row.cache_key).map_err(AppError::Database)?;
    let data = serde_json::from_str(&row.data)
        .map_err(|err| AppError::Database(format!("Invalid cached payload: {err}")))?;
    let cached_at = DateTime::from_timestamp(row.cached_at, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid cached_at: {}", row.cached_at)))?;

    Ok(CacheEntry {
        key,
        data,
        cached_at,
    })
}
