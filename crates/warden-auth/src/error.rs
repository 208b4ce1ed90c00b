//! Session engine errors.

use std::collections::TryReserveError;
use thiserror::Error;
use warden_types::ErrorCode;

/// Errors returned by [`Session`](crate::Session) operations.
///
/// Access checks never error: a denied or unknown request is simply `false`.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A required argument was empty.
    #[error("invalid argument: '{field}' must not be empty")]
    InvalidArgument {
        /// Name of the offending argument.
        field: &'static str,
    },

    /// Revoke targeted a scope that has never been granted.
    #[error("acl scope not found: {0}")]
    ScopeNotFound(String),

    /// Storage for a new ACL entry could not be reserved.
    #[error("allocation failed while storing acl entry: {0}")]
    Allocation(#[from] TryReserveError),

    /// The entropy source could not produce a session token.
    #[error("entropy source unavailable: {0}")]
    Entropy(#[source] std::io::Error),

    /// No attribute stored under the requested key.
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),
}

impl SessionError {
    /// Creates an InvalidArgument error.
    #[must_use]
    pub fn invalid_argument(field: &'static str) -> Self {
        Self::InvalidArgument { field }
    }

    /// Creates a ScopeNotFound error.
    pub fn scope_not_found(scope: impl Into<String>) -> Self {
        Self::ScopeNotFound(scope.into())
    }

    /// Creates an AttributeNotFound error.
    pub fn attribute_not_found(key: impl Into<String>) -> Self {
        Self::AttributeNotFound(key.into())
    }
}

impl ErrorCode for SessionError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "SESSION_INVALID_ARGUMENT",
            Self::ScopeNotFound(_) => "SESSION_SCOPE_NOT_FOUND",
            Self::Allocation(_) => "SESSION_ALLOCATION",
            Self::Entropy(_) => "SESSION_ENTROPY",
            Self::AttributeNotFound(_) => "SESSION_ATTRIBUTE_NOT_FOUND",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ScopeNotFound(_) | Self::AttributeNotFound(_) | Self::Entropy(_)
        )
    }
}
