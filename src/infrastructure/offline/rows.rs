use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PendingJobRow {
    pub local_id: i64,
    pub job_data: String,
    pub status: String,
    pub created_at: i64,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub reserved_job_id: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CacheEntryRow {
    pub cache_key: String,
    pub data: String,
    pub cached_at: i64,
}
