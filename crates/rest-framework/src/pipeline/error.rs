//! # Pipeline Errors
//!
//! [`HttpError`] is the value carried by the fail signal. It holds a message and, optionally, an
//! explicit status. Errors raised without a status are answered with 500.

use crate::error::{FrameworkError, StoreError};

pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Coarse classification of an [`HttpError`], derived from its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    /// Reserved for malformed body fields; nothing in the store enforces a schema.
    Validation,
    Unauthorized,
    Forbidden,
    /// No explicit status, or a 5xx.
    Internal,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    status: Option<u16>,
    message: String,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// An error with no explicit status.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn status_or_default(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_ERROR_STATUS)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        match self.status {
            None => ErrorKind::Internal,
            Some(400) | Some(422) => ErrorKind::Validation,
            Some(401) => ErrorKind::Unauthorized,
            Some(403) => ErrorKind::Forbidden,
            Some(404) => ErrorKind::NotFound,
            Some(s) if s >= 500 => ErrorKind::Internal,
            Some(_) => ErrorKind::Other,
        }
    }
}

impl From<FrameworkError> for HttpError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(_) => HttpError::not_found(e.to_string()),
            other => HttpError::msg(other.to_string()),
        }
    }
}

impl From<StoreError> for HttpError {
    fn from(e: StoreError) -> Self {
        FrameworkError::from(e).into()
    }
}
