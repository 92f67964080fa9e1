pub mod database;
pub mod net;
pub mod notify;
pub mod offline;
pub mod remote;
