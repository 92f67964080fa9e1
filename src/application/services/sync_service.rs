use crate::application::ports::connectivity::NetworkStatus;
use crate::application::ports::job_gateway::JobGateway;
use crate::application::ports::notifier::SyncNotifier;
use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::{PendingJob, PendingJobPatch, SyncOutcome, SyncReport};
use crate::domain::value_objects::{JobId, PendingStatus};
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Drains the pending queue against the backend: one record at a time,
/// reserve-then-submit, delete on success, bookkeep and move on when a
/// record fails. At most one drain runs at any moment; overlapping
/// triggers are dropped.
pub struct SyncService {
    store: Arc<dyn OfflineStore>,
    gateway: Arc<dyn JobGateway>,
    network: Arc<dyn NetworkStatus>,
    notifier: Arc<dyn SyncNotifier>,
    sync_in_progress: AtomicBool,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        gateway: Arc<dyn JobGateway>,
        network: Arc<dyn NetworkStatus>,
        notifier: Arc<dyn SyncNotifier>,
    ) -> Self {
        Self {
            store,
            gateway,
            network,
            notifier,
            sync_in_progress: AtomicBool::new(false),
        }
    }

    /// Startup reconciliation: records left `syncing` by an interrupted
    /// drain go back to `pending` before anything else can run.
    pub async fn recover_interrupted(&self) -> Result<u32, AppError> {
        self.store.recover_interrupted().await
    }

    /// Drain the queue once. Returns `Skipped` without touching anything
    /// when offline or when another drain is already in flight.
    pub async fn sync_pending_jobs(&self) -> Result<SyncOutcome, AppError> {
        if !self.network.is_online() {
            debug!("Still offline, cannot sync");
            return Ok(SyncOutcome::Skipped);
        }

        if self
            .sync_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Sync already in progress, skipping");
            return Ok(SyncOutcome::Skipped);
        }

        let outcome = self.drain().await;

        self.sync_in_progress.store(false, Ordering::SeqCst);
        if let Ok(count) = self.store.count_by_status(PendingStatus::Pending).await {
            self.notifier.pending_count_changed(count);
        }

        outcome.map(SyncOutcome::Completed)
    }

    async fn drain(&self) -> Result<SyncReport, AppError> {
        let pending = self.store.list_by_status(PendingStatus::Pending).await?;
        debug!("Found {} pending job(s) to sync", pending.len());

        if pending.is_empty() {
            return Ok(SyncReport::default());
        }

        self.notifier.sync_started(pending.len());

        let mut report = SyncReport::default();
        for job in pending {
            match self.sync_one(&job).await {
                Ok(job_id) => {
                    report.synced_count += 1;
                    debug!("Successfully synced job {} as {job_id}", job.local_id);
                }
                Err(err) => {
                    report.failed_count += 1;
                    warn!("Failed to sync job {}: {err}", job.local_id);
                    self.store
                        .record_failure(job.local_id, &err.to_string())
                        .await?;
                }
            }
        }

        info!(
            "Sync complete: {} synced, {} failed",
            report.synced_count, report.failed_count
        );
        self.notifier.sync_finished(&report);
        Ok(report)
    }

    async fn sync_one(&self, job: &PendingJob) -> Result<JobId, AppError> {
        self.store
            .update_pending(job.local_id, PendingJobPatch::status(PendingStatus::Syncing))
            .await?;

        let job_id = self.gateway.reserve_job_id().await?;
        self.store
            .update_pending(job.local_id, PendingJobPatch::reserved(job_id.clone()))
            .await?;

        match self.gateway.submit_job(job.fields.with_job_id(&job_id)).await {
            Ok(_queue_position) => {
                self.store.remove_pending(job.local_id).await?;
                Ok(job_id)
            }
            Err(err) => {
                // The backend has no release operation, so the reserved
                // identifier is stranded; the retry will reserve a new one.
                warn!("Abandoning reserved job id {job_id} after failed submission");
                Err(err)
            }
        }
    }

    /// Watch connectivity and drain on every online edge, after a short
    /// settle delay. Optionally runs a startup drain when already online.
    pub fn spawn_reconnect_listener(self: &Arc<Self>, config: SyncConfig) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let mut online_rx = service.network.subscribe();

        tokio::spawn(async move {
            if config.sync_on_start && service.network.is_online() {
                tokio::time::sleep(Duration::from_millis(config.startup_delay_ms)).await;
                if let Err(err) = service.sync_pending_jobs().await {
                    warn!("Startup sync failed: {err}");
                }
            }

            while online_rx.changed().await.is_ok() {
                let online = *online_rx.borrow_and_update();
                if !online {
                    debug!("Gone offline");
                    if let Ok(count) = service.store.count_by_status(PendingStatus::Pending).await
                    {
                        service.notifier.pending_count_changed(count);
                    }
                    continue;
                }

                debug!("Back online, triggering sync");
                tokio::time::sleep(Duration::from_millis(config.reconnect_delay_ms)).await;
                if let Err(err) = service.sync_pending_jobs().await {
                    warn!("Reconnect sync failed: {err}");
                }
            }
        })
    }
}
