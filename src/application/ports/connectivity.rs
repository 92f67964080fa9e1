use tokio::sync::watch;

/// Current connectivity plus edge-triggered transitions, fed by the
/// host shell's network signal. No polling.
pub trait NetworkStatus: Send + Sync {
    fn is_online(&self) -> bool;

    /// Receiver that changes on every online/offline transition.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
