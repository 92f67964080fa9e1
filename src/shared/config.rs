use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Direct backend endpoint. Only accepts non-preflighted requests,
    /// so bodies go out as text/plain.
    pub endpoint_url: String,
    /// Optional edge proxy tried before the direct endpoint.
    #[serde(default)]
    pub proxy_url: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Drain automatically shortly after engine start when online.
    pub sync_on_start: bool,
    /// Delay before the startup drain.
    pub startup_delay_ms: u64,
    /// Settle delay between the online edge and the drain it triggers.
    pub reconnect_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/gearbench.db".to_string(),
                max_connections: 5,
            },
            remote: RemoteConfig {
                endpoint_url: String::new(),
                proxy_url: None,
                request_timeout_secs: 30,
            },
            sync: SyncConfig {
                sync_on_start: true,
                startup_delay_ms: 3000,
                reconnect_delay_ms: 2000,
            },
            session: SessionConfig { ttl_hours: 8 },
        }
    }
}
