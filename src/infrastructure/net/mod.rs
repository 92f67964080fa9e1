pub mod connectivity;

pub use connectivity::ConnectivityState;
