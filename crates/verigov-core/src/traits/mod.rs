//! Core traits for credential storage.

mod token_store;

pub use token_store::TokenStore;
