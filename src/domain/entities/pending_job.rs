use crate::domain::value_objects::{JobFields, JobId, LocalId, PendingStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One job submission awaiting transmission. A record exists exactly as
/// long as the submission has not been accepted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingJob {
    pub local_id: LocalId,
    pub fields: JobFields,
    pub status: PendingStatus,
    pub created_at: DateTime<Utc>,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub reserved_job_id: Option<JobId>,
}

impl PendingJob {
    pub fn new(
        local_id: LocalId,
        fields: JobFields,
        status: PendingStatus,
        created_at: DateTime<Utc>,
        attempts: u32,
        last_error: Option<String>,
        reserved_job_id: Option<JobId>,
    ) -> Self {
        Self {
            local_id,
            fields,
            status,
            created_at,
            attempts,
            last_error,
            reserved_job_id,
        }
    }
}

/// Shallow-merge update: set fields overwrite, unset fields are kept.
/// `reserved_job_id` uses a double Option so `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct PendingJobPatch {
    pub status: Option<PendingStatus>,
    pub attempts: Option<u32>,
    pub last_error: Option<String>,
    pub reserved_job_id: Option<Option<JobId>>,
}

impl PendingJobPatch {
    pub fn status(status: PendingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn reserved(job_id: JobId) -> Self {
        Self {
            reserved_job_id: Some(Some(job_id)),
            ..Self::default()
        }
    }
}
