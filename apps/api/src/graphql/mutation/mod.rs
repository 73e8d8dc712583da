//! GraphQL mutations
//!
//! This module contains all mutation resolvers, organized by domain.

mod comment;
mod post;
mod token;
mod user;

pub use comment::CommentMutation;
pub use post::PostMutation;
pub use token::TokenMutation;
pub use user::UserMutation;

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, PostMutation, CommentMutation, TokenMutation);
