//! Error types for fleet requests

use thiserror::Error;

/// Errors raised while building requests and their tags
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Request id must not be empty")]
    EmptyId,

    #[error("Invalid priority value: {0}")]
    InvalidPriority(u64),

    #[error("Invalid state of charge: {0}")]
    InvalidStateOfCharge(String),
}
