use crate::application::ports::connectivity::NetworkStatus;
use tokio::sync::watch;
use tracing::debug;

/// Watch-channel backed connectivity signal. The host shell feeds
/// `set_online` from its platform network events; subscribers only see
/// actual transitions.
pub struct ConnectivityState {
    online_tx: watch::Sender<bool>,
}

impl ConnectivityState {
    pub fn new(initially_online: bool) -> Self {
        let (online_tx, _rx) = watch::channel(initially_online);
        Self { online_tx }
    }

    pub fn set_online(&self, online: bool) {
        let changed = self.online_tx.send_if_modified(|current| {
            if *current != online {
                *current = online;
                true
            } else {
                false
            }
        });
        if changed {
            debug!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
    }
}

impl NetworkStatus for ConnectivityState {
    fn is_online(&self) -> bool {
        *self.online_tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }
}
