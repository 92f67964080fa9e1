pub mod board_service;
pub mod intake_service;
pub mod session_service;
pub mod sync_service;

pub use board_service::{BoardService, BoardSnapshot};
pub use intake_service::IntakeService;
pub use session_service::SessionService;
pub use sync_service::SyncService;
