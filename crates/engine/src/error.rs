//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`FormatError`] thrown when the arguments of a command are malformed.
//!   Its `Display` is the corrective reply shown to the user.
//! - [`StoreError`] thrown by a [`Store`] when the blob cannot be read,
//!   decoded or written.
//! - [`EngineError`] returned by the engine operations, wrapping one of the
//!   two above.
//!
//!  [`Store`]: crate::Store
use thiserror::Error;

/// Malformed or missing command arguments.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Wrong argument layout; carries the expected usage, e.g.
    /// `/expense <amount> <description>`.
    #[error("❌ Please enter the command in the format: {0}")]
    Usage(&'static str),
    #[error("❌ Invalid amount. Please enter a positive number.")]
    InvalidAmount,
    #[error("❌ Please enter valid start and end dates in the format YYYY-MM-DD.")]
    InvalidDate,
}

/// Failures at the blob store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored document is not valid: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("document serialization failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Format(a), Self::Format(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
