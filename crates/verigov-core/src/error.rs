//! Error types for the VeriGov client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, HTTP, session, decoding, input validation and storage errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for VeriGov client operations.
///
/// The three variants a backend call can produce are [`Error::Transport`]
/// (no response obtained), [`Error::Http`] (non-2xx response) and
/// [`Error::Auth`] with [`AuthError::SessionExpired`] (renewal failed).
/// The remaining variants cover local failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response from the backend.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// Authentication errors (expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A successful response whose body did not match the declared type.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Input validation errors (invalid base URL, unencodable header).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Token store errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Flat classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport failed to produce a response.
    Network,
    /// The backend answered with a non-2xx status.
    Http { status: u16 },
    /// The session could not be renewed.
    SessionExpired,
    /// A 2xx body did not decode.
    Decode,
    /// Invalid caller input.
    InvalidInput,
    /// Token store failure.
    Storage,
}

impl Error {
    /// Returns the flat classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) => ErrorKind::Network,
            Error::Http(err) => ErrorKind::Http { status: err.status },
            Error::Auth(AuthError::SessionExpired) => ErrorKind::SessionExpired,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns the HTTP status for [`Error::Http`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) => Some(err.status),
            _ => None,
        }
    }

    /// Returns true if this error means the user must authenticate again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::Auth(AuthError::SessionExpired))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Any other failure to obtain a response.
    #[error("request failed: {message}")]
    Request { message: String },
}

/// A non-2xx response, with a message derived from its body.
#[derive(Debug)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable message derived from the response body.
    pub message: String,
}

impl HttpError {
    /// Create a new HTTP error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The session expired and could not be renewed.
    #[error("session expired, log in again")]
    SessionExpired,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A header name or value that cannot be sent.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Token store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The stored session could not be parsed.
    #[error("malformed session file {path}: {message}")]
    Format { path: String, message: String },
}
