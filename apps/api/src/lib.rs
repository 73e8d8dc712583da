//! Quill API library
//!
//! This module exposes the core API components for use in integration tests
//! and as a library.

pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod supervisor;

// Re-export commonly used types
pub use error::{ApiError, ApiResult, AuthFailure, BatchError};
pub use services::{AuthConfig, AuthService};
