//! GraphQL schema builder
//!
//! This module provides the schema construction for the async-graphql API.
//! The schema itself is stateless; everything request-scoped (storage handle,
//! loaders, caller identity) enters through per-request data attached by the
//! HTTP handler.

use async_graphql::{EmptySubscription, Schema};

use super::mutation::Mutation;
use super::query::Query;

/// The Quill GraphQL schema type
pub type QuillSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create the GraphQL schema
pub fn build_schema() -> QuillSchema {
    Schema::build(Query::default(), Mutation::default(), EmptySubscription).finish()
}
