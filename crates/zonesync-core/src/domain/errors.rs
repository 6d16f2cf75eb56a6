//! Domain error types
//!
//! This module defines error types for domain-level validation, such as
//! malformed zone names or storage endpoints.

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Zone name is empty or contains a path separator
    #[error("Invalid zone name: {0}")]
    InvalidZoneName(String),

    /// Storage endpoint is not an absolute http(s) URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
