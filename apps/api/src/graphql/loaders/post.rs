//! Post loader for batched fetching
//!
//! Batches the post ID lookups behind `Comment.post` into single projected
//! queries, solving the N+1 problem on that edge.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::ApiResult;
use crate::graphql::loaders::{BatchFetcher, BatchedLoader};
use crate::graphql::projection::FieldSet;
use crate::models::Post;
use crate::repositories::PostRepository;

/// Fetches post windows through the post repository.
pub struct PostFetcher {
    repo: PostRepository,
}

impl PostFetcher {
    pub fn new(repo: PostRepository) -> Self {
        Self { repo }
    }
}

impl BatchFetcher for PostFetcher {
    type Key = Uuid;
    type Value = Post;
    const ENTITY: &'static str = "post";

    async fn fetch(&self, keys: &[Uuid], fields: &FieldSet) -> ApiResult<HashMap<Uuid, Post>> {
        Ok(self.repo.fetch_many(keys, fields).await?)
    }
}

/// Batching loader for posts by ID
pub type PostLoader = BatchedLoader<PostFetcher>;
