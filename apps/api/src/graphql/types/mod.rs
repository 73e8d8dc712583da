//! GraphQL type definitions
//!
//! This module contains the object types exposed through the API. Each
//! wraps its database model; field accessors refuse to invent values for
//! columns the projection never fetched, and relationship fields go through
//! the request's batched loaders.

mod comment;
mod post;
mod token;
mod user;

pub use comment::Comment;
pub use post::Post;
pub use token::Token;
pub use user::User;

use crate::error::ApiError;

/// Error for reading a field the projection did not fetch.
///
/// Reaching this means a resolver read a field it never projected, which is
/// a bug in that resolver's field options rather than in the request.
pub(crate) fn unfetched(type_name: &'static str, field: &'static str) -> ApiError {
    ApiError::Internal(format!(
        "{}.{} was read but never fetched; check the resolver's projection",
        type_name, field
    ))
}
