use serde::{Deserialize, Serialize};

/// Outcome of one drain pass over the pending queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub synced_count: u32,
    pub failed_count: u32,
}

impl SyncReport {
    pub fn new(synced_count: u32, failed_count: u32) -> Self {
        Self {
            synced_count,
            failed_count,
        }
    }

    pub fn total(&self) -> u32 {
        self.synced_count + self.failed_count
    }

    /// User-facing result line. None when the pass processed nothing.
    pub fn summary(&self) -> Option<String> {
        let synced = self.synced_count;
        let failed = self.failed_count;
        match (synced, failed) {
            (0, 0) => None,
            (s, 0) => Some(format!("{s} job{} synced successfully", plural(s))),
            (0, f) => Some(format!("Failed to sync {f} job{} - will retry", plural(f))),
            (s, f) => Some(format!("{s} synced, {f} failed - will retry")),
        }
    }
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Result of a drain request. `Skipped` covers the single-flight and
/// offline no-ops; neither is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Skipped,
    Completed(SyncReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_distinguishes_outcomes() {
        assert_eq!(SyncReport::new(0, 0).summary(), None);
        assert_eq!(
            SyncReport::new(1, 0).summary().unwrap(),
            "1 job synced successfully"
        );
        assert_eq!(
            SyncReport::new(2, 1).summary().unwrap(),
            "2 synced, 1 failed - will retry"
        );
        assert_eq!(
            SyncReport::new(0, 3).summary().unwrap(),
            "Failed to sync 3 jobs - will retry"
        );
    }
}
