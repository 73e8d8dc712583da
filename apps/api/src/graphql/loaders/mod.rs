//! Batched entity loaders for GraphQL
//!
//! This module provides the per-request loaders that batch relationship
//! lookups into single projected queries. Unlike a schema-wide cache, every
//! request gets a fresh [`Loaders`] value, so nothing fetched here outlives
//! the request that asked for it.

mod batch;
mod post;
mod user;

pub use batch::{BatchFetcher, BatchedLoader, LoadResult, LoaderConfig};
pub use post::{PostFetcher, PostLoader};
pub use user::{UserFetcher, UserLoader};

use sqlx::PgPool;

use crate::repositories::{PostRepository, UserRepository};

/// Container for all loaders of one request
pub struct Loaders {
    pub users: UserLoader,
    pub posts: PostLoader,
}

/// Create fresh loaders for a single request
pub fn create_loaders(pool: &PgPool, config: &LoaderConfig) -> Loaders {
    Loaders {
        users: BatchedLoader::new(
            UserFetcher::new(UserRepository::new(pool.clone())),
            config,
        ),
        posts: BatchedLoader::new(
            PostFetcher::new(PostRepository::new(pool.clone())),
            config,
        ),
    }
}
