//! User mutations
//!
//! - createUser: public registration
//! - updateUser: update the caller's profile
//! - updateUserPassword: replace the caller's password
//! - deleteUser: delete the caller's account
//!
//! Everything except `createUser` runs behind the authentication guard and
//! operates on the verified caller, never on a client-supplied user id.

use std::sync::Arc;

use async_graphql::{Context, InputObject, Object, Result};
use once_cell::sync::Lazy;

use crate::error::{ApiError, ApiResult};
use crate::graphql::compose::{compose, resolver, ComposableResolver};
use crate::graphql::context::{RequestContext, ResolverRequest};
use crate::graphql::guards::auth_guard;
use crate::graphql::types::User;
use crate::models::User as DbUser;
use crate::services::auth::is_valid_email;

// =============================================================================
// Validation Constants
// =============================================================================

/// Minimum password length for registration and password changes
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum display name length
const MAX_NAME_LENGTH: usize = 255;

// =============================================================================
// Input Types
// =============================================================================

/// Input for user registration
#[derive(Debug, InputObject)]
pub struct CreateUserInput {
    /// Display name
    pub name: String,
    /// Email address (must be unique)
    pub email: String,
    /// Password (minimum 8 characters)
    pub password: String,
}

/// Input for profile updates
///
/// At least one field must be provided; absent fields stay unchanged.
#[derive(Debug, InputObject)]
pub struct UpdateUserInput {
    /// New display name
    pub name: Option<String>,
    /// New email address (must be unique)
    pub email: Option<String>,
}

/// Input for password changes
#[derive(Debug, InputObject)]
pub struct UpdateUserPasswordInput {
    /// New password (minimum 8 characters)
    pub password: String,
}

// =============================================================================
// Validation Helpers
// =============================================================================

fn validate_name(name: &str) -> ApiResult<()> {
    if name.is_empty() {
        return Err(ApiError::validation("name must not be empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ApiError::validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> ApiResult<()> {
    if !is_valid_email(email) {
        return Err(ApiError::validation("invalid email address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// Guarded Pipelines
// =============================================================================

/// Pipeline behind `updateUser`
static UPDATE_USER: Lazy<ComposableResolver<UpdateUserInput, DbUser>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(update_user)));

/// Pipeline behind `updateUserPassword`
static UPDATE_USER_PASSWORD: Lazy<ComposableResolver<UpdateUserPasswordInput, DbUser>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(update_user_password)));

/// Pipeline behind `deleteUser`
static DELETE_USER: Lazy<ComposableResolver<(), bool>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(delete_user)));

async fn update_user(request: ResolverRequest<UpdateUserInput>) -> ApiResult<DbUser> {
    let caller = *request.ctx.require_auth_user()?;
    let input = &request.args;

    if input.name.is_none() && input.email.is_none() {
        return Err(ApiError::validation(
            "at least one of name or email must be provided",
        ));
    }
    let name = match &input.name {
        Some(name) => {
            let name = name.trim();
            validate_name(name)?;
            Some(name)
        }
        None => None,
    };
    if let Some(email) = &input.email {
        validate_email(email)?;
    }

    let updated = request
        .ctx
        .users
        .update_profile(caller.id, name, input.email.as_deref())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::validation("email already registered")
            }
            _ => ApiError::Storage(e),
        })?
        .ok_or_else(|| ApiError::not_found("user", caller.id.to_string()))?;

    tracing::info!(user_id = %caller.id, "user profile updated");
    Ok(updated)
}

async fn update_user_password(
    request: ResolverRequest<UpdateUserPasswordInput>,
) -> ApiResult<DbUser> {
    let caller = *request.ctx.require_auth_user()?;
    validate_password(&request.args.password)?;

    let password_hash = request
        .ctx
        .auth_service()
        .hash_password(&request.args.password)?;
    let updated = request
        .ctx
        .users
        .update_password(caller.id, &password_hash)
        .await?
        .ok_or_else(|| ApiError::not_found("user", caller.id.to_string()))?;

    tracing::info!(user_id = %caller.id, "user password changed");
    Ok(updated)
}

async fn delete_user(request: ResolverRequest<()>) -> ApiResult<bool> {
    let caller = *request.ctx.require_auth_user()?;

    let deleted = request.ctx.users.delete(caller.id).await?;
    if !deleted {
        return Err(ApiError::not_found("user", caller.id.to_string()));
    }

    tracing::info!(user_id = %caller.id, "user account deleted");
    Ok(true)
}

// =============================================================================
// Mutation Object
// =============================================================================

/// User mutations
#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Register a new user account
    ///
    /// # Errors
    /// - Returns a validation error if the name is empty or too long
    /// - Returns a validation error if the email is malformed or already registered
    /// - Returns a validation error if the password is shorter than 8 characters
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<User> {
        let context = ctx.data::<Arc<RequestContext>>()?;

        let name = input.name.trim();
        validate_name(name)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if context
            .users
            .email_exists(&input.email)
            .await
            .map_err(ApiError::from)?
        {
            return Err(ApiError::validation("email already registered").into());
        }

        let password_hash = context.auth_service().hash_password(&input.password)?;
        let user = context
            .users
            .create(name, &input.email, &password_hash)
            .await
            .map_err(|e| match &e {
                // Races with a concurrent registration land here
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    ApiError::validation("email already registered")
                }
                _ => ApiError::Storage(e),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(User::from(user))
    }

    /// Update the authenticated caller's profile
    ///
    /// At least one of `name` or `email` must be provided.
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns a validation error for empty input or a taken email
    async fn update_user(&self, ctx: &Context<'_>, input: UpdateUserInput) -> Result<User> {
        let request = ResolverRequest::from_ctx(ctx, input)?;
        Ok(UPDATE_USER.resolve(request).await.map(User::from)?)
    }

    /// Replace the authenticated caller's password
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns a validation error if the password is shorter than 8 characters
    async fn update_user_password(
        &self,
        ctx: &Context<'_>,
        input: UpdateUserPasswordInput,
    ) -> Result<User> {
        let request = ResolverRequest::from_ctx(ctx, input)?;
        Ok(UPDATE_USER_PASSWORD.resolve(request).await.map(User::from)?)
    }

    /// Delete the authenticated caller's account
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    async fn delete_user(&self, ctx: &Context<'_>) -> Result<bool> {
        let request = ResolverRequest::from_ctx(ctx, ())?;
        Ok(DELETE_USER.resolve(request).await?)
    }
}
