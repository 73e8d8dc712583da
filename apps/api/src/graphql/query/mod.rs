//! GraphQL queries
//!
//! This module contains all query resolvers, organized by domain.

mod comment;
mod post;
mod user;

pub use comment::CommentQuery;
pub use post::PostQuery;
pub use user::UserQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(UserQuery, PostQuery, CommentQuery);
