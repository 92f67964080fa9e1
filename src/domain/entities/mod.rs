pub mod cache_entry;
pub mod pending_job;
pub mod submission;
pub mod sync_report;

pub use cache_entry::CacheEntry;
pub use pending_job::{PendingJob, PendingJobPatch};
pub use submission::SubmissionReceipt;
pub use sync_report::{SyncOutcome, SyncReport};
