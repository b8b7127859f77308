//! verigov-http - Authenticated HTTP client for the VeriGov backend.
//!
//! All backend calls flow through a [`RequestPipeline`], which attaches the
//! stored bearer token, renews the session once on a 401 through the
//! [`RefreshCoordinator`], and announces an unrecoverable session on the
//! [`SessionEventBus`](verigov_core::SessionEventBus).

mod client;
mod config;
pub mod endpoints;
mod pipeline;
mod refresh;
mod request;
mod transport;

pub use client::VerigovClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use pipeline::RequestPipeline;
pub use refresh::RefreshCoordinator;
pub use request::RequestDescriptor;
pub use transport::{GENERIC_FAILURE, HttpTransport, error_message};
