use crate::domain::value_objects::{JobId, LocalId};
use serde::{Deserialize, Serialize};

/// What the intake path hands back to the caller. Queuing is a success
/// from the user's point of view; there is no hard-failure variant
/// short of the local store itself being unavailable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SubmissionReceipt {
    Online {
        job_id: JobId,
        queue_position: Option<u32>,
    },
    Queued {
        local_id: LocalId,
    },
}

impl SubmissionReceipt {
    pub fn was_queued(&self) -> bool {
        matches!(self, SubmissionReceipt::Queued { .. })
    }
}
