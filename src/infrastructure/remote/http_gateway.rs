use crate::application::ports::job_gateway::JobGateway;
use crate::domain::value_objects::JobId;
use crate::shared::config::RemoteConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Response envelope shared by every backend action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    queue_position: Option<u32>,
    #[serde(default)]
    jobs: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiResponse {
    fn rejection(self, fallback: &str) -> String {
        self.error.unwrap_or_else(|| fallback.to_string())
    }
}

/// HTTP adapter for the spreadsheet backend. Requests carry an
/// `action` field naming the operation; the edge proxy is tried first
/// when configured and abandoned for the session after one failure.
pub struct HttpJobGateway {
    client: Client,
    endpoint_url: String,
    proxy_url: Option<String>,
    use_proxy: AtomicBool,
}

impl HttpJobGateway {
    pub fn new(config: &RemoteConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            proxy_url: config.proxy_url.clone(),
            use_proxy: AtomicBool::new(config.proxy_url.is_some()),
        })
    }

    async fn call(&self, action: &str, data: Value) -> Result<ApiResponse, AppError> {
        let mut payload = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        payload.insert("action".to_string(), Value::String(action.to_string()));
        let payload = Value::Object(payload);

        if self.use_proxy.load(Ordering::Relaxed) {
            if let Some(proxy_url) = &self.proxy_url {
                match self.post_json(proxy_url, &payload).await {
                    Ok(response) => return Ok(response),
                    Err(err) => {
                        warn!("Proxy unavailable, falling back to direct endpoint: {err}");
                        self.use_proxy.store(false, Ordering::Relaxed);
                    }
                }
            }
        }

        debug!("Calling backend action `{action}` directly");
        self.post_plain(&self.endpoint_url, &payload).await
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<ApiResponse, AppError> {
        let response = self.client.post(url).json(payload).send().await?;
        Self::decode(response).await
    }

    async fn post_plain(&self, url: &str, payload: &Value) -> Result<ApiResponse, AppError> {
        // The direct endpoint rejects preflighted requests, so the body
        // must go out as text/plain to stay a CORS "simple" request.
        let body = serde_json::to_string(payload)?;
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<ApiResponse, AppError> {
        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "API error: {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl JobGateway for HttpJobGateway {
    async fn reserve_job_id(&self) -> Result<JobId, AppError> {
        let response = self
            .call("reserveJobId", json!({}))
            .await
            .map_err(|err| AppError::ReserveFailed(err.to_string()))?;

        if !response.success {
            return Err(AppError::ReserveFailed(
                response.rejection("reservation rejected"),
            ));
        }

        let job_id = response
            .job_id
            .ok_or_else(|| AppError::ReserveFailed("response carried no job id".to_string()))?;
        JobId::new(job_id).map_err(AppError::ReserveFailed)
    }

    async fn submit_job(&self, payload: Value) -> Result<Option<u32>, AppError> {
        let response = self
            .call("submitJob", payload)
            .await
            .map_err(|err| AppError::SubmitFailed(err.to_string()))?;

        if !response.success {
            return Err(AppError::SubmitFailed(
                response.rejection("submission rejected"),
            ));
        }

        Ok(response.queue_position)
    }

    async fn verify_pin(&self, pin: &str) -> Result<bool, AppError> {
        let response = self.call("verifyPin", json!({ "pin": pin })).await?;
        Ok(response.success)
    }

    async fn fetch_jobs(&self) -> Result<Value, AppError> {
        let response = self.call("getJobs", json!({})).await?;

        if !response.success {
            return Err(AppError::Network(response.rejection("job list unavailable")));
        }

        Ok(response.jobs.unwrap_or_else(|| Value::Array(Vec::new())))
    }
}
