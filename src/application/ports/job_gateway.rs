use crate::domain::value_objects::JobId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Remote backend port. Two queue RPCs plus the board/session actions
/// that ride the same request envelope.
///
/// Each `reserve_job_id` call reserves a fresh identifier; there is no
/// idempotency key and no way to release a reservation, so a submission
/// that fails after reserving strands its identifier on the backend.
#[async_trait]
pub trait JobGateway: Send + Sync {
    /// Reserve the next job identifier. Failure (transport or rejected
    /// response) surfaces as `AppError::ReserveFailed`.
    async fn reserve_job_id(&self) -> Result<JobId, AppError>;

    /// Submit a job payload (fields with `jobId` attached). Returns the
    /// assigned queue position when the backend reports one. Failure
    /// surfaces as `AppError::SubmitFailed`.
    async fn submit_job(&self, payload: Value) -> Result<Option<u32>, AppError>;

    /// Check an operator PIN. `Ok(false)` means a well-formed rejection.
    async fn verify_pin(&self, pin: &str) -> Result<bool, AppError>;

    /// Fetch the current job list for the board.
    async fn fetch_jobs(&self) -> Result<Value, AppError>;
}
