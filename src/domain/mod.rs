#![allow(unused_imports)]

pub mod entities;
pub mod value_objects;

pub use entities::{
    CacheEntry, PendingJob, PendingJobPatch, SubmissionReceipt, SyncOutcome, SyncReport,
};
pub use value_objects::{CacheKey, JobFields, JobId, LocalId, PendingStatus};
