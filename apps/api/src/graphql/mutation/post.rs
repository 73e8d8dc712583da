//! Post mutations
//!
//! - createPost: publish a post authored by the caller
//! - updatePost: edit one of the caller's posts
//! - deletePost: remove one of the caller's posts
//!
//! All three run behind the authentication guard. Update and delete lock the
//! target row, compare its author to the caller, and write inside the same
//! transaction, so ownership cannot change between the check and the write.

use async_graphql::{Context, InputObject, Object, Result, ID};
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::graphql::compose::{compose, resolver, ComposableResolver};
use crate::graphql::context::ResolverRequest;
use crate::graphql::guards::auth_guard;
use crate::graphql::types::Post;
use crate::models::Post as DbPost;

// =============================================================================
// Validation Constants
// =============================================================================

/// Maximum post title length
const MAX_TITLE_LENGTH: usize = 255;

/// Maximum post body length
const MAX_CONTENT_LENGTH: usize = 50_000;

/// Maximum cover photo URL length
const MAX_PHOTO_URL_LENGTH: usize = 2_048;

// =============================================================================
// Input Types
// =============================================================================

/// Input for creating a post
#[derive(Debug, InputObject)]
pub struct CreatePostInput {
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Cover photo URL (http or https)
    pub photo: Option<String>,
}

/// Input for updating a post
///
/// At least one field must be provided; absent fields stay unchanged.
#[derive(Debug, InputObject)]
pub struct UpdatePostInput {
    /// New title
    pub title: Option<String>,
    /// New body
    pub content: Option<String>,
    /// New cover photo URL (http or https)
    pub photo: Option<String>,
}

/// Arguments carried through the `updatePost` pipeline
struct UpdatePostArgs {
    post_id: Uuid,
    input: UpdatePostInput,
}

// =============================================================================
// Validation Helpers
// =============================================================================

fn validate_title(title: &str) -> ApiResult<()> {
    if title.is_empty() {
        return Err(ApiError::validation("title must not be empty"));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(ApiError::validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> ApiResult<()> {
    if content.trim().is_empty() {
        return Err(ApiError::validation("content must not be empty"));
    }
    if content.len() > MAX_CONTENT_LENGTH {
        return Err(ApiError::validation(format!(
            "content must be at most {} characters",
            MAX_CONTENT_LENGTH
        )));
    }
    Ok(())
}

fn validate_photo_url(photo: &str) -> ApiResult<()> {
    if photo.len() > MAX_PHOTO_URL_LENGTH {
        return Err(ApiError::validation(format!(
            "photo URL must be at most {} characters",
            MAX_PHOTO_URL_LENGTH
        )));
    }
    if !photo.starts_with("http://") && !photo.starts_with("https://") {
        return Err(ApiError::validation("photo URL must be http or https"));
    }
    Ok(())
}

// =============================================================================
// Guarded Pipelines
// =============================================================================

/// Pipeline behind `createPost`
static CREATE_POST: Lazy<ComposableResolver<CreatePostInput, DbPost>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(create_post)));

/// Pipeline behind `updatePost`
static UPDATE_POST: Lazy<ComposableResolver<UpdatePostArgs, DbPost>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(update_post)));

/// Pipeline behind `deletePost`
static DELETE_POST: Lazy<ComposableResolver<Uuid, bool>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(delete_post)));

async fn create_post(request: ResolverRequest<CreatePostInput>) -> ApiResult<DbPost> {
    let caller = *request.ctx.require_auth_user()?;
    let input = &request.args;

    let title = input.title.trim();
    validate_title(title)?;
    validate_content(&input.content)?;
    if let Some(photo) = &input.photo {
        validate_photo_url(photo)?;
    }

    let post = request
        .ctx
        .posts
        .create(caller.id, title, &input.content, input.photo.as_deref())
        .await?;

    tracing::info!(post_id = %post.id, user_id = %caller.id, "post created");
    Ok(post)
}

async fn update_post(request: ResolverRequest<UpdatePostArgs>) -> ApiResult<DbPost> {
    let caller = *request.ctx.require_auth_user()?;
    let post_id = request.args.post_id;
    let input = &request.args.input;

    if input.title.is_none() && input.content.is_none() && input.photo.is_none() {
        return Err(ApiError::validation("at least one field must be provided"));
    }
    let title = match &input.title {
        Some(title) => {
            let title = title.trim();
            validate_title(title)?;
            Some(title)
        }
        None => None,
    };
    if let Some(content) = &input.content {
        validate_content(content)?;
    }
    if let Some(photo) = &input.photo {
        validate_photo_url(photo)?;
    }

    let mut tx = request.ctx.pool().begin().await?;

    let author_id = request
        .ctx
        .posts
        .find_author_for_update(&mut tx, post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post", post_id.to_string()))?;

    if author_id != caller.id {
        // Dropping the uncommitted transaction releases the lock
        return Err(ApiError::authorization("only the author may update this post"));
    }

    let updated = request
        .ctx
        .posts
        .update_in_tx(
            &mut tx,
            post_id,
            title,
            input.content.as_deref(),
            input.photo.as_deref(),
        )
        .await?;

    tx.commit().await?;

    tracing::info!(post_id = %post_id, user_id = %caller.id, "post updated");
    Ok(updated)
}

async fn delete_post(request: ResolverRequest<Uuid>) -> ApiResult<bool> {
    let caller = *request.ctx.require_auth_user()?;
    let post_id = request.args;

    let mut tx = request.ctx.pool().begin().await?;

    let author_id = request
        .ctx
        .posts
        .find_author_for_update(&mut tx, post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post", post_id.to_string()))?;

    if author_id != caller.id {
        return Err(ApiError::authorization("only the author may delete this post"));
    }

    let deleted = request.ctx.posts.delete_in_tx(&mut tx, post_id).await?;
    tx.commit().await?;

    tracing::info!(post_id = %post_id, user_id = %caller.id, "post deleted");
    Ok(deleted)
}

// =============================================================================
// Mutation Object
// =============================================================================

/// Post mutations
#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create a post authored by the authenticated caller
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns a validation error for an empty title or body
    async fn create_post(&self, ctx: &Context<'_>, input: CreatePostInput) -> Result<Post> {
        let request = ResolverRequest::from_ctx(ctx, input)?;
        Ok(CREATE_POST.resolve(request).await.map(Post::from)?)
    }

    /// Update a post; only its author may do so
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns `NOT_FOUND` if the post does not exist
    /// - Returns `FORBIDDEN` if the caller is not the post's author
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdatePostInput,
    ) -> Result<Post> {
        let post_id =
            Uuid::parse_str(&id).map_err(|_| ApiError::validation("invalid post id"))?;
        let request = ResolverRequest::from_ctx(ctx, UpdatePostArgs { post_id, input })?;
        Ok(UPDATE_POST.resolve(request).await.map(Post::from)?)
    }

    /// Delete a post; only its author may do so
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns `NOT_FOUND` if the post does not exist
    /// - Returns `FORBIDDEN` if the caller is not the post's author
    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let post_id =
            Uuid::parse_str(&id).map_err(|_| ApiError::validation("invalid post id"))?;
        let request = ResolverRequest::from_ctx(ctx, post_id)?;
        Ok(DELETE_POST.resolve(request).await?)
    }
}
