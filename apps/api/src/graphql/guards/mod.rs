//! Resolver guards
//!
//! Decorators that gate composed resolver pipelines. Guards run before the
//! resolver they wrap and decide whether the request continues inward.

mod auth;

pub use auth::{auth_guard, authenticate, extract_bearer_token};
