//! User queries
//!
//! - `users`: page through accounts
//! - `user`: look up one account by ID
//! - `currentUser`: the authenticated caller's own account

use async_graphql::{Context, Object, Result, ID};
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::graphql::compose::{compose, resolver, ComposableResolver};
use crate::graphql::context::ResolverRequest;
use crate::graphql::guards::auth_guard;
use crate::graphql::pagination;
use crate::graphql::projection::FieldOptions;
use crate::graphql::types::User;
use crate::models::User as DbUser;

/// Pipeline behind `currentUser`: authentication guard wrapped around the
/// account lookup.
static CURRENT_USER: Lazy<ComposableResolver<(), DbUser>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(current_user)));

async fn current_user(request: ResolverRequest<()>) -> ApiResult<DbUser> {
    let caller = *request.ctx.require_auth_user()?;
    let fields = request.fields(FieldOptions {
        keep: &["id"],
        ..FieldOptions::default()
    });
    request
        .ctx
        .users
        .find_by_id(caller.id, &fields)
        .await?
        .ok_or_else(|| ApiError::not_found("user", caller.id.to_string()))
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// List user accounts with pagination
    async fn users(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Maximum number of users to return")] first: Option<i32>,
        #[graphql(desc = "Number of users to skip")] offset: Option<i32>,
    ) -> Result<Vec<User>> {
        let request = ResolverRequest::from_ctx(ctx, ())?;
        let page = pagination::page(first, offset)?;
        let fields = request.fields(FieldOptions {
            keep: &["id"],
            ..FieldOptions::default()
        });

        let users = request
            .ctx
            .users
            .find_page(&fields, page.limit, page.offset)
            .await
            .map_err(ApiError::from)?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Look up a single user by ID.
    ///
    /// The field is nullable so a miss only nulls this field; the error it
    /// records leaves sibling fields of the same request intact.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<User>> {
        let user_id =
            Uuid::parse_str(&id).map_err(|_| ApiError::validation("invalid user id"))?;
        let request = ResolverRequest::from_ctx(ctx, ())?;
        let fields = request.fields(FieldOptions {
            keep: &["id"],
            ..FieldOptions::default()
        });

        let user = request
            .ctx
            .users
            .find_by_id(user_id, &fields)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found("user", user_id.to_string()))?;

        Ok(Some(User::from(user)))
    }

    /// The account of the authenticated caller.
    ///
    /// Nullable for the same reason as `user`: a rejected credential must
    /// not knock out sibling fields resolved in the same request.
    async fn current_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let request = ResolverRequest::from_ctx(ctx, ())?;
        let user = CURRENT_USER.resolve(request).await?;
        Ok(Some(User::from(user)))
    }
}
