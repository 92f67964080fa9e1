use crate::domain::value_objects::CacheKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Last known snapshot of server-fetched data, kept for offline display.
/// Upsert-by-key; no eviction beyond overwrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub data: Value,
    pub cached_at: DateTime<Utc>,
}
