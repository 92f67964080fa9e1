use serde::{Deserialize, Serialize};

/// Lifecycle of a queued submission. `Synced` is an exit state: a record
/// that reaches it is deleted rather than stored. `Failed` is reserved
/// for a capped-retry policy and is never assigned by the current engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingStatus {
    Pending,
    Syncing,
    Synced,
    Failed,
    Unknown(String),
}

impl PendingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PendingStatus::Pending => "pending",
            PendingStatus::Syncing => "syncing",
            PendingStatus::Synced => "synced",
            PendingStatus::Failed => "failed",
            PendingStatus::Unknown(value) => value.as_str(),
        }
    }
}

impl From<&str> for PendingStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => PendingStatus::Pending,
            "syncing" => PendingStatus::Syncing,
            "synced" => PendingStatus::Synced,
            "failed" => PendingStatus::Failed,
            other => PendingStatus::Unknown(other.to_string()),
        }
    }
}
