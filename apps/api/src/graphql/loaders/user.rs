//! User loader for batched fetching
//!
//! Batches the user ID lookups behind `Post.author` and `Comment.user` into
//! single projected queries, solving the N+1 problem on those edges.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::ApiResult;
use crate::graphql::loaders::{BatchFetcher, BatchedLoader};
use crate::graphql::projection::FieldSet;
use crate::models::User;
use crate::repositories::UserRepository;

/// Fetches user windows through the user repository.
pub struct UserFetcher {
    repo: UserRepository,
}

impl UserFetcher {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }
}

impl BatchFetcher for UserFetcher {
    type Key = Uuid;
    type Value = User;
    const ENTITY: &'static str = "user";

    async fn fetch(&self, keys: &[Uuid], fields: &FieldSet) -> ApiResult<HashMap<Uuid, User>> {
        Ok(self.repo.fetch_many(keys, fields).await?)
    }
}

/// Batching loader for users by ID
pub type UserLoader = BatchedLoader<UserFetcher>;
