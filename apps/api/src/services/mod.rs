//! Business logic services
//!
//! This module contains the core logic that does not belong to any single
//! resolver:
//! - Credential verification, password hashing, and JWT issuance

pub mod auth;

pub use auth::{AuthConfig, AuthService};
