use crate::application::ports::notifier::SyncNotifier;
use crate::domain::entities::SyncReport;
use tracing::{debug, info, warn};

/// Default sink for headless use: badge counts and drain results go to
/// the log. GUI shells supply their own `SyncNotifier` instead.
pub struct LogNotifier;

impl SyncNotifier for LogNotifier {
    fn pending_count_changed(&self, count: u32) {
        if count > 0 {
            info!("{count} job(s) waiting to sync");
        } else {
            debug!("Pending queue empty");
        }
    }

    fn sync_started(&self, queued: usize) {
        info!("Syncing {queued} offline job(s)...");
    }

    fn sync_finished(&self, report: &SyncReport) {
        if let Some(summary) = report.summary() {
            if report.failed_count > 0 {
                warn!("{summary}");
            } else {
                info!("{summary}");
            }
        }
    }
}
