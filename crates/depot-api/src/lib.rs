// depot-api: Async Rust client for the depot file-hosting REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DepotClient;
pub use error::Error;
pub use models::{ConnectionRecord, DeleteResponse, FileRecord, NetworkStats};
pub use transport::TransportConfig;
