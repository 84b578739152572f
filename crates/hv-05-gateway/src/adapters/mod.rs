//! Gateway adapters: HTTP and in-process.

pub mod http_client;
pub mod local;

pub use http_client::{ClientConfig, HttpGateway};
pub use local::LocalGateway;
