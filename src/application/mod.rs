pub mod ports;
pub mod services;

pub use services::{BoardService, IntakeService, SessionService, SyncService};
