//! User GraphQL type
//!
//! This module defines the GraphQL type for users with relationship
//! resolvers. The password hash is not reachable from here: the underlying
//! model has no such field and no projection can request the column.

use std::sync::Arc;

use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::RequestContext;
use crate::graphql::pagination;
use crate::graphql::projection::{project, selected_field_names, FieldOptions};
use crate::models::User as DbUser;

use super::post::Post;
use super::unfetched;

/// User account exposed via GraphQL
pub struct User {
    inner: DbUser,
}

impl User {
    /// Create a new GraphQL User from a database User
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    /// Unique user identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Display name
    async fn name(&self) -> Result<&str> {
        Ok(self
            .inner
            .name
            .as_deref()
            .ok_or_else(|| unfetched("User", "name"))?)
    }

    /// Email address
    async fn email(&self) -> Result<&str> {
        Ok(self
            .inner
            .email
            .as_deref()
            .ok_or_else(|| unfetched("User", "email"))?)
    }

    /// Account creation timestamp
    async fn created_at(&self) -> Result<DateTime<Utc>> {
        Ok(self
            .inner
            .created_at
            .ok_or_else(|| unfetched("User", "createdAt"))?)
    }

    /// Last profile update timestamp
    async fn updated_at(&self) -> Result<DateTime<Utc>> {
        Ok(self
            .inner
            .updated_at
            .ok_or_else(|| unfetched("User", "updatedAt"))?)
    }

    // Relationship resolvers (projected through the page's own selection)

    /// Posts written by this user, newest first
    async fn posts(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<Post>> {
        let context = ctx.data::<Arc<RequestContext>>()?;
        let page = pagination::page(first, offset)?;
        let fields = project(
            &selected_field_names(ctx),
            FieldOptions {
                keep: &["id"],
                exclude: &["comments"],
            },
        );

        let posts = context
            .posts
            .find_page_by_author(self.inner.id, &fields, page.limit, page.offset)
            .await
            .map_err(ApiError::from)?;

        Ok(posts.into_iter().map(Post::from).collect())
    }
}
