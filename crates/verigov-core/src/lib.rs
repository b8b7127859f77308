//! verigov-core - Core types for the VeriGov compliance client.
//!
//! This crate has no network or filesystem awareness. It defines the
//! credential types, the [`TokenStore`] seam, the [`SessionEventBus`] and
//! the wire models shared by the HTTP client and its collaborators.

pub mod credentials;
pub mod error;
pub mod events;
pub mod memory;
pub mod models;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, Registration};
pub use error::{Error, ErrorKind};
pub use events::{SessionEvent, SessionEventBus, Subscription};
pub use memory::MemoryTokenStore;
pub use tokens::{AccessToken, CredentialPair, RefreshToken};
pub use traits::TokenStore;
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
