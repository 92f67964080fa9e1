//! Port doubles shared by unit and integration tests.

use crate::application::ports::job_gateway::JobGateway;
use crate::application::ports::notifier::SyncNotifier;
use crate::domain::entities::SyncReport;
use crate::domain::value_objects::JobId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Gateway double driven by a script: a queue of identifiers to
/// reserve, optional per-identifier submit failures, optional blanket
/// reserve failure, optional per-call delay.
pub struct ScriptedGateway {
    reserve_ids: Mutex<VecDeque<String>>,
    reserve_error: Mutex<Option<String>>,
    submit_failures: Mutex<HashMap<String, String>>,
    submitted: Mutex<Vec<Value>>,
    reserve_calls: AtomicU32,
    call_delay: Mutex<Option<Duration>>,
    queue_position: Mutex<Option<u32>>,
    accepted_pin: Mutex<Option<String>>,
    jobs: Mutex<Option<Value>>,
    jobs_error: Mutex<Option<String>>,
}

impl ScriptedGateway {
    fn empty() -> Self {
        Self {
            reserve_ids: Mutex::new(VecDeque::new()),
            reserve_error: Mutex::new(None),
            submit_failures: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            reserve_calls: AtomicU32::new(0),
            call_delay: Mutex::new(None),
            queue_position: Mutex::new(Some(3)),
            accepted_pin: Mutex::new(None),
            jobs: Mutex::new(None),
            jobs_error: Mutex::new(None),
        }
    }

    /// Reserves the given identifiers in order; further calls fail.
    pub fn reserving<I, S>(ids: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let gateway = Self::empty();
        *gateway.reserve_ids.lock().unwrap() = ids.into_iter().map(Into::into).collect();
        Arc::new(gateway)
    }

    /// Every reservation fails with the given message.
    pub fn failing_reserve(message: &str) -> Arc<Self> {
        let gateway = Self::empty();
        *gateway.reserve_error.lock().unwrap() = Some(message.to_string());
        Arc::new(gateway)
    }

    /// Serves the given job list; the queue RPCs stay unscripted.
    pub fn with_jobs(jobs: Value) -> Arc<Self> {
        let gateway = Self::empty();
        *gateway.jobs.lock().unwrap() = Some(jobs);
        Arc::new(gateway)
    }

    pub fn accepting_pin(pin: &str) -> Arc<Self> {
        let gateway = Self::empty();
        *gateway.accepted_pin.lock().unwrap() = Some(pin.to_string());
        Arc::new(gateway)
    }

    pub fn fail_submit_for(&self, job_id: &str, message: &str) {
        self.submit_failures
            .lock()
            .unwrap()
            .insert(job_id.to_string(), message.to_string());
    }

    pub fn delay_each_call(&self, delay: Duration) {
        *self.call_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_jobs(&self, message: &str) {
        *self.jobs_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn submitted_payloads(&self) -> Vec<Value> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn reserve_calls(&self) -> u32 {
        self.reserve_calls.load(Ordering::SeqCst)
    }

    async fn maybe_delay(&self) {
        let delay = *self.call_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl JobGateway for ScriptedGateway {
    async fn reserve_job_id(&self) -> Result<JobId, AppError> {
        self.maybe_delay().await;
        self.reserve_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.reserve_error.lock().unwrap().clone() {
            return Err(AppError::ReserveFailed(message));
        }

        let next = self
            .reserve_ids
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::ReserveFailed("reservation script exhausted".to_string()))?;
        JobId::new(next).map_err(AppError::ReserveFailed)
    }

    async fn submit_job(&self, payload: Value) -> Result<Option<u32>, AppError> {
        self.maybe_delay().await;

        let job_id = payload
            .get("jobId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.submitted.lock().unwrap().push(payload);

        if let Some(message) = self.submit_failures.lock().unwrap().get(&job_id) {
            return Err(AppError::SubmitFailed(message.clone()));
        }

        Ok(*self.queue_position.lock().unwrap())
    }

    async fn verify_pin(&self, pin: &str) -> Result<bool, AppError> {
        Ok(self.accepted_pin.lock().unwrap().as_deref() == Some(pin))
    }

    async fn fetch_jobs(&self) -> Result<Value, AppError> {
        if let Some(message) = self.jobs_error.lock().unwrap().clone() {
            return Err(AppError::Network(message));
        }
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Badge(u32),
    Started(usize),
    Finished(SyncReport),
}

/// Notifier double that records every callback in order.
pub struct RecordingNotifier {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn badge_counts(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RecordedEvent::Badge(count) => Some(count),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl SyncNotifier for RecordingNotifier {
    fn pending_count_changed(&self, count: u32) {
        self.events.lock().unwrap().push(RecordedEvent::Badge(count));
    }

    fn sync_started(&self, queued: usize) {
        self.events
            .lock()
            .unwrap()
            .push(RecordedEvent::Started(queued));
    }

    fn sync_finished(&self, report: &SyncReport) {
        self.events
            .lock()
            .unwrap()
            .push(RecordedEvent::Finished(report.clone()));
    }
}
