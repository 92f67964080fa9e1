use crate::domain::entities::SyncReport;

/// User-facing side effects: the pending-count badge and the transient
/// drain messages. The engine and store depend only on this trait,
/// never on a concrete surface.
pub trait SyncNotifier: Send + Sync {
    fn pending_count_changed(&self, count: u32);

    fn sync_started(&self, queued: usize);

    fn sync_finished(&self, report: &SyncReport);
}
