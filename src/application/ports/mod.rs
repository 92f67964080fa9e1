pub mod connectivity;
pub mod job_gateway;
pub mod notifier;
pub mod offline_store;

pub use connectivity::NetworkStatus;
pub use job_gateway::JobGateway;
pub use notifier::SyncNotifier;
pub use offline_store::OfflineStore;
