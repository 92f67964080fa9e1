use crate::application::ports::job_gateway::JobGateway;
use crate::shared::config::SessionConfig;
use crate::shared::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Operator session: a PIN checked remotely once, then a local
/// timestamp with a fixed TTL. Nothing else is stored.
pub struct SessionService {
    gateway: Arc<dyn JobGateway>,
    ttl: Duration,
    authenticated_at: RwLock<Option<DateTime<Utc>>>,
}

impl SessionService {
    pub fn new(gateway: Arc<dyn JobGateway>, config: &SessionConfig) -> Self {
        Self::with_ttl(gateway, Duration::hours(config.ttl_hours))
    }

    pub fn with_ttl(gateway: Arc<dyn JobGateway>, ttl: Duration) -> Self {
        Self {
            gateway,
            ttl,
            authenticated_at: RwLock::new(None),
        }
    }

    /// Verify the PIN against the backend; a confirmed PIN opens the
    /// session. `Ok(false)` is a rejected PIN, not an error.
    pub async fn login(&self, pin: &str) -> Result<bool, AppError> {
        if !self.gateway.verify_pin(pin).await? {
            return Ok(false);
        }

        *self.authenticated_at.write().await = Some(Utc::now());
        info!("Operator session opened");
        Ok(true)
    }

    /// An expired stamp is cleared on the way out.
    pub async fn is_authenticated(&self) -> bool {
        let mut stamp = self.authenticated_at.write().await;
        match *stamp {
            Some(at) if Utc::now().signed_duration_since(at) < self.ttl => true,
            Some(_) => {
                *stamp = None;
                debug!("Operator session expired");
                false
            }
            None => false,
        }
    }

    pub async fn logout(&self) {
        *self.authenticated_at.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGateway;

    #[tokio::test]
    async fn accepted_pin_opens_a_session() {
        let service = SessionService::with_ttl(
            ScriptedGateway::accepting_pin("1234"),
            Duration::hours(8),
        );

        assert!(!service.is_authenticated().await);
        assert!(service.login("1234").await.unwrap());
        assert!(service.is_authenticated().await);

        service.logout().await;
        assert!(!service.is_authenticated().await);
    }

    #[tokio::test]
    async fn rejected_pin_leaves_the_session_closed() {
        let service = SessionService::with_ttl(
            ScriptedGateway::accepting_pin("1234"),
            Duration::hours(8),
        );

        assert!(!service.login("0000").await.unwrap());
        assert!(!service.is_authenticated().await);
    }

    #[tokio::test]
    async fn session_expires_after_the_ttl() {
        let service =
            SessionService::with_ttl(ScriptedGateway::accepting_pin("1234"), Duration::zero());

        assert!(service.login("1234").await.unwrap());
        assert!(!service.is_authenticated().await);
    }
}
