//! Database repository layer
//!
//! This module provides the data access layer, centralizing all database
//! operations into reusable repositories. This pattern:
//! - Keeps every SQL statement for an entity in one place
//! - Builds projected SELECT lists from allowlisted columns only
//! - Exposes transaction-scoped primitives so resolvers can run their
//!   ownership checks and writes atomically

pub mod comment;
pub mod post;
pub mod user;

pub use comment::CommentRepository;
pub use post::PostRepository;
pub use user::UserRepository;
