//! Comment mutations
//!
//! - createComment: comment on a post as the caller
//! - updateComment: edit one of the caller's comments
//! - deleteComment: remove one of the caller's comments
//!
//! All three run behind the authentication guard; update and delete use the
//! same lock-check-write transaction shape as the post mutations.

use async_graphql::{Context, InputObject, Object, Result, ID};
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::graphql::compose::{compose, resolver, ComposableResolver};
use crate::graphql::context::ResolverRequest;
use crate::graphql::guards::auth_guard;
use crate::graphql::types::Comment;
use crate::models::Comment as DbComment;

// =============================================================================
// Validation Constants
// =============================================================================

/// Maximum comment body length
const MAX_COMMENT_LENGTH: usize = 10_000;

// =============================================================================
// Input Types
// =============================================================================

/// Input for creating a comment
#[derive(Debug, InputObject)]
pub struct CreateCommentInput {
    /// Comment body
    pub content: String,
    /// ID of the post being commented on
    pub post_id: ID,
}

/// Input for updating a comment
#[derive(Debug, InputObject)]
pub struct UpdateCommentInput {
    /// New comment body
    pub content: String,
}

/// Arguments carried through the `createComment` pipeline
struct CreateCommentArgs {
    post_id: Uuid,
    content: String,
}

/// Arguments carried through the `updateComment` pipeline
struct UpdateCommentArgs {
    comment_id: Uuid,
    content: String,
}

// =============================================================================
// Validation Helpers
// =============================================================================

fn validate_comment(content: &str) -> ApiResult<()> {
    if content.trim().is_empty() {
        return Err(ApiError::validation("content must not be empty"));
    }
    if content.len() > MAX_COMMENT_LENGTH {
        return Err(ApiError::validation(format!(
            "content must be at most {} characters",
            MAX_COMMENT_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// Guarded Pipelines
// =============================================================================

/// Pipeline behind `createComment`
static CREATE_COMMENT: Lazy<ComposableResolver<CreateCommentArgs, DbComment>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(create_comment)));

/// Pipeline behind `updateComment`
static UPDATE_COMMENT: Lazy<ComposableResolver<UpdateCommentArgs, DbComment>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(update_comment)));

/// Pipeline behind `deleteComment`
static DELETE_COMMENT: Lazy<ComposableResolver<Uuid, bool>> =
    Lazy::new(|| compose(vec![auth_guard()])(resolver(delete_comment)));

async fn create_comment(request: ResolverRequest<CreateCommentArgs>) -> ApiResult<DbComment> {
    let caller = *request.ctx.require_auth_user()?;
    let args = &request.args;

    validate_comment(&args.content)?;

    let comment = request
        .ctx
        .comments
        .create(caller.id, args.post_id, &args.content)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                ApiError::not_found("post", args.post_id.to_string())
            }
            _ => ApiError::Storage(e),
        })?;

    tracing::info!(
        comment_id = %comment.id,
        post_id = %args.post_id,
        user_id = %caller.id,
        "comment created"
    );
    Ok(comment)
}

async fn update_comment(request: ResolverRequest<UpdateCommentArgs>) -> ApiResult<DbComment> {
    let caller = *request.ctx.require_auth_user()?;
    let args = &request.args;

    validate_comment(&args.content)?;

    let mut tx = request.ctx.pool().begin().await?;

    let owner_id = request
        .ctx
        .comments
        .find_owner_for_update(&mut tx, args.comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("comment", args.comment_id.to_string()))?;

    if owner_id != caller.id {
        // Dropping the uncommitted transaction releases the lock
        return Err(ApiError::authorization(
            "only the author may update this comment",
        ));
    }

    let updated = request
        .ctx
        .comments
        .update_in_tx(&mut tx, args.comment_id, &args.content)
        .await?;

    tx.commit().await?;

    tracing::info!(comment_id = %args.comment_id, user_id = %caller.id, "comment updated");
    Ok(updated)
}

async fn delete_comment(request: ResolverRequest<Uuid>) -> ApiResult<bool> {
    let caller = *request.ctx.require_auth_user()?;
    let comment_id = request.args;

    let mut tx = request.ctx.pool().begin().await?;

    let owner_id = request
        .ctx
        .comments
        .find_owner_for_update(&mut tx, comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("comment", comment_id.to_string()))?;

    if owner_id != caller.id {
        return Err(ApiError::authorization(
            "only the author may delete this comment",
        ));
    }

    let deleted = request.ctx.comments.delete_in_tx(&mut tx, comment_id).await?;
    tx.commit().await?;

    tracing::info!(comment_id = %comment_id, user_id = %caller.id, "comment deleted");
    Ok(deleted)
}

// =============================================================================
// Mutation Object
// =============================================================================

/// Comment mutations
#[derive(Default)]
pub struct CommentMutation;

#[Object]
impl CommentMutation {
    /// Comment on a post as the authenticated caller
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns `NOT_FOUND` if the post does not exist
    /// - Returns a validation error for an empty body
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        input: CreateCommentInput,
    ) -> Result<Comment> {
        let post_id = Uuid::parse_str(&input.post_id)
            .map_err(|_| ApiError::validation("invalid post id"))?;
        let request = ResolverRequest::from_ctx(
            ctx,
            CreateCommentArgs {
                post_id,
                content: input.content,
            },
        )?;
        Ok(CREATE_COMMENT.resolve(request).await.map(Comment::from)?)
    }

    /// Update a comment; only its author may do so
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns `NOT_FOUND` if the comment does not exist
    /// - Returns `FORBIDDEN` if the caller is not the comment's author
    async fn update_comment(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateCommentInput,
    ) -> Result<Comment> {
        let comment_id =
            Uuid::parse_str(&id).map_err(|_| ApiError::validation("invalid comment id"))?;
        let request = ResolverRequest::from_ctx(
            ctx,
            UpdateCommentArgs {
                comment_id,
                content: input.content,
            },
        )?;
        Ok(UPDATE_COMMENT.resolve(request).await.map(Comment::from)?)
    }

    /// Delete a comment; only its author may do so
    ///
    /// # Errors
    /// - Returns an authentication error if the caller is not authenticated
    /// - Returns `NOT_FOUND` if the comment does not exist
    /// - Returns `FORBIDDEN` if the caller is not the comment's author
    async fn delete_comment(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let comment_id =
            Uuid::parse_str(&id).map_err(|_| ApiError::validation("invalid comment id"))?;
        let request = ResolverRequest::from_ctx(ctx, comment_id)?;
        Ok(DELETE_COMMENT.resolve(request).await?)
    }
}
