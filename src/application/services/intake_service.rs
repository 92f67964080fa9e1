use crate::application::ports::connectivity::NetworkStatus;
use crate::application::ports::job_gateway::JobGateway;
use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::SubmissionReceipt;
use crate::domain::value_objects::JobFields;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The form-submit path. Online submissions go straight to the backend
/// (reserve, then submit); anything that goes wrong falls back to the
/// durable queue so the user always sees "accepted". Without a queue
/// (degraded online-only mode) the remote error is the caller's to show.
pub struct IntakeService {
    gateway: Arc<dyn JobGateway>,
    network: Arc<dyn NetworkStatus>,
    queue: Option<Arc<dyn OfflineStore>>,
}

impl IntakeService {
    pub fn new(
        gateway: Arc<dyn JobGateway>,
        network: Arc<dyn NetworkStatus>,
        queue: Option<Arc<dyn OfflineStore>>,
    ) -> Self {
        Self {
            gateway,
            network,
            queue,
        }
    }

    pub async fn submit(&self, fields: JobFields) -> Result<SubmissionReceipt, AppError> {
        if self.network.is_online() {
            debug!("Online - attempting direct submission");
            match self.submit_direct(&fields).await {
                Ok(receipt) => return Ok(receipt),
                Err(err) => match &self.queue {
                    Some(queue) => {
                        warn!("Direct submission failed, queueing locally: {err}");
                        let job = queue.add_pending(fields).await?;
                        return Ok(SubmissionReceipt::Queued {
                            local_id: job.local_id,
                        });
                    }
                    None => return Err(err),
                },
            }
        }

        let queue = self.queue.as_ref().ok_or_else(|| {
            AppError::StorageUnavailable("offline with no durable queue".to_string())
        })?;

        debug!("Offline - queueing job locally");
        let job = queue.add_pending(fields).await?;
        Ok(SubmissionReceipt::Queued {
            local_id: job.local_id,
        })
    }

    async fn submit_direct(&self, fields: &JobFields) -> Result<SubmissionReceipt, AppError> {
        let job_id = self.gateway.reserve_job_id().await?;
        let queue_position = self.gateway.submit_job(fields.with_job_id(&job_id)).await?;
        info!("Job accepted as {job_id}");

        Ok(SubmissionReceipt::Online {
            job_id,
            queue_position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{JobId, PendingStatus};
    use crate::infrastructure::net::ConnectivityState;
    use crate::infrastructure::offline::SqliteOfflineStore;
    use crate::test_support::{RecordingNotifier, ScriptedGateway};
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> Arc<dyn OfflineStore> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        Arc::new(SqliteOfflineStore::new(pool, RecordingNotifier::new()))
    }

    fn fields() -> JobFields {
        JobFields::new(json!({ "name": "Alice", "bike": "Road" })).unwrap()
    }

    #[tokio::test]
    async fn online_submission_returns_the_assigned_id() {
        let gateway = ScriptedGateway::reserving(["GG-001"]);
        let service = IntakeService::new(
            gateway.clone(),
            Arc::new(ConnectivityState::new(true)),
            Some(store().await),
        );

        let receipt = service.submit(fields()).await.unwrap();

        assert_eq!(
            receipt,
            SubmissionReceipt::Online {
                job_id: JobId::new("GG-001".into()).unwrap(),
                queue_position: Some(3),
            }
        );
        assert_eq!(gateway.submitted_payloads()[0]["jobId"], "GG-001");
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_the_queue() {
        let gateway = ScriptedGateway::failing_reserve("backend down");
        let queue = store().await;
        let service = IntakeService::new(
            gateway,
            Arc::new(ConnectivityState::new(true)),
            Some(queue.clone()),
        );

        let receipt = service.submit(fields()).await.unwrap();

        assert!(receipt.was_queued());
        assert_eq!(
            queue.count_by_status(PendingStatus::Pending).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn offline_submission_is_queued_without_touching_the_gateway() {
        let gateway = ScriptedGateway::reserving(["GG-001"]);
        let queue = store().await;
        let service = IntakeService::new(
            gateway.clone(),
            Arc::new(ConnectivityState::new(false)),
            Some(queue.clone()),
        );

        let receipt = service.submit(fields()).await.unwrap();

        assert!(receipt.was_queued());
        assert_eq!(gateway.reserve_calls(), 0);
        assert_eq!(
            queue.count_by_status(PendingStatus::Pending).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn degraded_mode_surfaces_the_remote_error() {
        let gateway = ScriptedGateway::failing_reserve("backend down");
        let service =
            IntakeService::new(gateway, Arc::new(ConnectivityState::new(true)), None);

        let err = service.submit(fields()).await.unwrap_err();
        assert!(matches!(err, AppError::ReserveFailed(_)));
    }

    #[tokio::test]
    async fn degraded_mode_offline_cannot_defer() {
        let gateway = ScriptedGateway::reserving(["GG-001"]);
        let service =
            IntakeService::new(gateway, Arc::new(ConnectivityState::new(false)), None);

        let err = service.submit(fields()).await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }
}
