//! Error handling for the Quill API
//!
//! This module provides the unified error type hierarchy using thiserror.
//! Every resolver-facing failure is normalized into one of these variants
//! and surfaced to GraphQL clients as a field-level error carrying a stable
//! `code` extension, so a single failing field never aborts its siblings.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Reason a credential was rejected.
///
/// These kinds are stable: the underlying jsonwebtoken error message is never
/// forwarded to clients, only mapped onto one of these variants.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No `Authorization` header was supplied
    #[error("authentication required")]
    MissingCredential,

    /// The header or token structure could not be parsed
    #[error("malformed authentication token")]
    MalformedToken,

    /// The token's expiry claim is in the past
    #[error("authentication token has expired")]
    ExpiredToken,

    /// The token signature does not match the verification secret
    #[error("invalid token signature")]
    InvalidSignature,

    /// Login attempt with an unknown email or wrong password
    #[error("wrong email or password")]
    BadCredentials,
}

impl From<jsonwebtoken::errors::Error> for AuthFailure {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::ExpiredToken,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::MalformedToken,
        }
    }
}

/// Error shared by every pending load in a failed batch flush.
///
/// Cloneable so the single storage failure behind a flush can be handed to
/// each caller that was waiting on that window.
#[derive(Error, Debug, Clone)]
pub enum BatchError {
    /// The window's storage call failed; every pending load sees this
    #[error("batch fetch for {entity} failed: {cause}")]
    Fetch {
        entity: &'static str,
        cause: Arc<ApiError>,
    },

    /// The flush task was dropped before fulfilling its window
    #[error("batch fetch for {entity} was abandoned before completing")]
    Aborted { entity: &'static str },
}

impl BatchError {
    pub fn fetch(entity: &'static str, cause: Arc<ApiError>) -> Self {
        Self::Fetch { entity, cause }
    }

    pub fn aborted(entity: &'static str) -> Self {
        Self::Aborted { entity }
    }

    /// The storage failure behind this error, if there was one
    pub fn cause(&self) -> Option<&ApiError> {
        match self {
            Self::Fetch { cause, .. } => Some(cause),
            Self::Aborted { .. } => None,
        }
    }
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Resource Errors ==========
    /// Lookup by id yielded no row
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    // ========== Authentication & Authorization ==========
    /// Missing, invalid, or expired credential
    #[error(transparent)]
    Authentication(#[from] AuthFailure),

    /// Authenticated, but not allowed to touch this resource
    #[error("not allowed: {0}")]
    Authorization(String),

    // ========== Validation ==========
    /// Malformed input to a query or mutation
    #[error("validation error: {0}")]
    Validation(String),

    // ========== Storage ==========
    /// Database query failed (constraint violation, connection failure, ...)
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A batched fetch failed; surfaces identically to every load in the window
    #[error(transparent)]
    Batch(#[from] BatchError),

    // ========== Internal ==========
    /// Unexpected server fault (hashing or token encoding failures)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Authentication(_) => "UNAUTHENTICATED",
            Self::Authorization(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Batch(_) => "BATCH_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    /// Log the error with severity matched to its kind
    pub fn log(&self) {
        match self {
            Self::Storage(_) | Self::Batch(_) | Self::Internal(_) => {
                tracing::error!(error = %self, code = self.error_code(), "server error");
            }
            Self::Authentication(_) | Self::Authorization(_) => {
                tracing::warn!(error = %self, code = self.error_code(), "request rejected");
            }
            _ => {
                tracing::debug!(error = %self, code = self.error_code(), "client error");
            }
        }
    }
}

impl From<ApiError> for async_graphql::Error {
    fn from(err: ApiError) -> Self {
        err.log();
        let code = err.error_code();
        async_graphql::Error::new(err.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
