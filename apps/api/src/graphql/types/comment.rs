//! Comment GraphQL type
//!
//! This module defines the GraphQL type for comments with relationship
//! resolvers. Both edges go through batched loaders, so resolving a page of
//! comments costs one user fetch and one post fetch regardless of length.

use std::sync::Arc;

use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::RequestContext;
use crate::graphql::projection::{project, selected_field_names, FieldOptions};
use crate::models::Comment as DbComment;

use super::post::Post;
use super::unfetched;
use super::user::User;

/// Comment exposed via GraphQL
pub struct Comment {
    inner: DbComment,
}

impl Comment {
    /// Create a new GraphQL Comment from a database Comment
    pub fn new(comment: DbComment) -> Self {
        Self { inner: comment }
    }
}

impl From<DbComment> for Comment {
    fn from(comment: DbComment) -> Self {
        Self::new(comment)
    }
}

#[Object]
impl Comment {
    /// Unique comment identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Comment body
    async fn content(&self) -> Result<&str> {
        Ok(self
            .inner
            .content
            .as_deref()
            .ok_or_else(|| unfetched("Comment", "content"))?)
    }

    /// Creation timestamp
    async fn created_at(&self) -> Result<DateTime<Utc>> {
        Ok(self
            .inner
            .created_at
            .ok_or_else(|| unfetched("Comment", "createdAt"))?)
    }

    /// Last update timestamp
    async fn updated_at(&self) -> Result<DateTime<Utc>> {
        Ok(self
            .inner
            .updated_at
            .ok_or_else(|| unfetched("Comment", "updatedAt"))?)
    }

    // Relationship resolvers (batched through the request's loaders)

    /// User who wrote this comment
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        let context = ctx.data::<Arc<RequestContext>>()?;
        let user_id = self
            .inner
            .user_id
            .ok_or_else(|| unfetched("Comment", "user"))?;
        let hint = project(&selected_field_names(ctx), FieldOptions::default());

        let user = context
            .loaders
            .users
            .load(user_id, &hint)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found("user", user_id.to_string()))?;

        Ok(User::from(user))
    }

    /// Post this comment belongs to
    async fn post(&self, ctx: &Context<'_>) -> Result<Post> {
        let context = ctx.data::<Arc<RequestContext>>()?;
        let post_id = self
            .inner
            .post_id
            .ok_or_else(|| unfetched("Comment", "post"))?;
        let hint = project(
            &selected_field_names(ctx),
            FieldOptions {
                exclude: &["comments"],
                ..FieldOptions::default()
            },
        );

        let post = context
            .loaders
            .posts
            .load(post_id, &hint)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found("post", post_id.to_string()))?;

        Ok(Post::from(post))
    }
}
