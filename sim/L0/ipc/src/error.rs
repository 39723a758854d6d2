//! Error types for contact potential evaluation.

use thiserror::Error;

/// Errors reported by constraint construction, configuration and indexing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IpcError {
    /// Flat constraint index past the end of a constraint set.
    #[error("constraint index {index} out of range for set of size {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of stored constraints.
        len: usize,
    },

    /// Invalid barrier or friction parameters.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Constraint rejected at construction.
    #[error("invalid constraint: {reason}")]
    InvalidConstraint {
        /// Description of what's wrong.
        reason: String,
    },
}

impl IpcError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid constraint error.
    #[must_use]
    pub fn invalid_constraint(reason: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            reason: reason.into(),
        }
    }

    /// Check if this is an indexing error.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

/// Result type for contact potential operations.
pub type Result<T> = std::result::Result<T, IpcError>;
