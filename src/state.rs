use crate::application::ports::connectivity::NetworkStatus;
use crate::application::ports::job_gateway::JobGateway;
use crate::application::ports::notifier::SyncNotifier;
use crate::application::ports::offline_store::OfflineStore;
use crate::application::services::{BoardService, IntakeService, SessionService, SyncService};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::net::ConnectivityState;
use crate::infrastructure::offline::SqliteOfflineStore;
use crate::infrastructure::remote::HttpJobGateway;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// The object graph, built once per process: the single store handle,
/// the remote gateway, the connectivity signal, and the services that
/// share them.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub connectivity: Arc<ConnectivityState>,
    pub intake: Arc<IntakeService>,
    pub board: Arc<BoardService>,
    pub session: Arc<SessionService>,
    /// Absent in degraded online-only mode (store could not be opened).
    pub sync: Option<Arc<SyncService>>,
}

impl AppState {
    pub async fn init(
        config: AppConfig,
        notifier: Arc<dyn SyncNotifier>,
    ) -> Result<Self, AppError> {
        let gateway: Arc<dyn JobGateway> = Arc::new(HttpJobGateway::new(&config.remote)?);
        let connectivity = Arc::new(ConnectivityState::new(true));
        let network: Arc<dyn NetworkStatus> = connectivity.clone();

        // A store that will not open is not fatal: submissions simply
        // cannot be deferred until the next restart.
        let store = match Self::open_store(&config, notifier.clone()).await {
            Ok(store) => Some(store),
            Err(err) => {
                warn!("Durable queue unavailable, running online-only: {err}");
                None
            }
        };

        let sync = match &store {
            Some(store) => {
                let sync = Arc::new(SyncService::new(
                    store.clone(),
                    gateway.clone(),
                    network.clone(),
                    notifier.clone(),
                ));
                sync.recover_interrupted().await?;
                Some(sync)
            }
            None => None,
        };

        let intake = Arc::new(IntakeService::new(
            gateway.clone(),
            network.clone(),
            store.clone(),
        ));
        let board = Arc::new(BoardService::new(
            gateway.clone(),
            network.clone(),
            store.clone(),
        ));
        let session = Arc::new(SessionService::new(gateway, &config.session));

        Ok(Self {
            config,
            connectivity,
            intake,
            board,
            session,
            sync,
        })
    }

    /// Start the reconnect/startup drain loop. `None` in degraded mode.
    pub fn start_sync_engine(&self) -> Option<JoinHandle<()>> {
        self.sync
            .as_ref()
            .map(|sync| sync.spawn_reconnect_listener(self.config.sync.clone()))
    }

    async fn open_store(
        config: &AppConfig,
        notifier: Arc<dyn SyncNotifier>,
    ) -> Result<Arc<dyn OfflineStore>, AppError> {
        ensure_data_dir(&config.database.url)
            .map_err(|err| AppError::StorageUnavailable(err.to_string()))?;

        let pool =
            ConnectionPool::new(&config.database.url, config.database.max_connections).await?;
        pool.migrate().await?;

        Ok(Arc::new(SqliteOfflineStore::new(
            pool.get_pool().clone(),
            notifier,
        )))
    }
}

fn ensure_data_dir(database_url: &str) -> std::io::Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
