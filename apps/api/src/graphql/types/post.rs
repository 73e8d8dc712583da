//! Post GraphQL type
//!
//! This module defines the GraphQL type for posts with relationship
//! resolvers. The author edge goes through the batched user loader, carrying
//! the author object's own selection as the fetch hint.

use std::sync::Arc;

use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::RequestContext;
use crate::graphql::pagination;
use crate::graphql::projection::{project, selected_field_names, FieldOptions};
use crate::models::Post as DbPost;

use super::comment::Comment;
use super::unfetched;
use super::user::User;

/// Post exposed via GraphQL
pub struct Post {
    inner: DbPost,
}

impl Post {
    /// Create a new GraphQL Post from a database Post
    pub fn new(post: DbPost) -> Self {
        Self { inner: post }
    }
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self::new(post)
    }
}

#[Object]
impl Post {
    /// Unique post identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Post title
    async fn title(&self) -> Result<&str> {
        Ok(self
            .inner
            .title
            .as_deref()
            .ok_or_else(|| unfetched("Post", "title"))?)
    }

    /// Post body
    async fn content(&self) -> Result<&str> {
        Ok(self
            .inner
            .content
            .as_deref()
            .ok_or_else(|| unfetched("Post", "content"))?)
    }

    /// Cover photo URL
    async fn photo(&self) -> Result<Option<&str>> {
        Ok(self
            .inner
            .photo
            .as_ref()
            .ok_or_else(|| unfetched("Post", "photo"))?
            .as_deref())
    }

    /// Creation timestamp
    async fn created_at(&self) -> Result<DateTime<Utc>> {
        Ok(self
            .inner
            .created_at
            .ok_or_else(|| unfetched("Post", "createdAt"))?)
    }

    /// Last update timestamp
    async fn updated_at(&self) -> Result<DateTime<Utc>> {
        Ok(self
            .inner
            .updated_at
            .ok_or_else(|| unfetched("Post", "updatedAt"))?)
    }

    // Relationship resolvers (batched through the request's loaders)

    /// Author of this post
    async fn author(&self, ctx: &Context<'_>) -> Result<User> {
        let context = ctx.data::<Arc<RequestContext>>()?;
        let author_id = self
            .inner
            .author_id
            .ok_or_else(|| unfetched("Post", "author"))?;
        let hint = project(
            &selected_field_names(ctx),
            FieldOptions {
                keep: &["id"],
                ..FieldOptions::default()
            },
        );

        let user = context
            .loaders
            .users
            .load(author_id, &hint)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found("user", author_id.to_string()))?;

        Ok(User::from(user))
    }

    /// Comments on this post in thread order
    async fn comments(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<Comment>> {
        let context = ctx.data::<Arc<RequestContext>>()?;
        let page = pagination::page(first, offset)?;
        let fields = project(&selected_field_names(ctx), FieldOptions::default());

        let comments = context
            .comments
            .find_page_by_post(self.inner.id, &fields, page.limit, page.offset)
            .await
            .map_err(ApiError::from)?;

        Ok(comments.into_iter().map(Comment::from).collect())
    }
}
