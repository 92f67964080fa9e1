//! Offline-first client core for the Gearbench workshop intake tracker.
//!
//! Job submissions that cannot reach the backend are persisted in a
//! local SQLite queue and drained by the sync engine whenever
//! connectivity returns: one record at a time, reserve an identifier,
//! submit, delete on success, bookkeep and retry on failure. The host
//! shell supplies the connectivity signal and a [`SyncNotifier`] for
//! badge counts and toasts; everything else is wired by [`AppState`].

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;
pub mod test_support;

pub use application::ports::{JobGateway, NetworkStatus, OfflineStore, SyncNotifier};
pub use application::services::{
    BoardService, BoardSnapshot, IntakeService, SessionService, SyncService,
};
pub use domain::entities::{
    CacheEntry, PendingJob, PendingJobPatch, SubmissionReceipt, SyncOutcome, SyncReport,
};
pub use domain::value_objects::{CacheKey, JobFields, JobId, LocalId, PendingStatus};
pub use shared::{AppConfig, AppError, Result};
pub use state::AppState;

/// Set up the tracing subscriber. Call once, early.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gearbench=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
