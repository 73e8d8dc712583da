//! GraphQL schema and resolvers
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for users, posts, and comments
//! - Mutation resolvers for registration, login, and content CRUD
//! - Per-request batched entity loaders with field projection
//! - The composable resolver pipeline and its authentication guard

pub mod compose;
pub mod context;
pub mod guards;
pub mod loaders;
pub mod mutation;
pub mod pagination;
pub mod projection;
pub mod query;
pub mod schema;
pub mod types;

pub use context::{RequestContext, ResolverRequest};
pub use schema::{build_schema, QuillSchema};
