//! Comment queries
//!
//! - `commentsByPost`: page through one post's comments in thread order

use async_graphql::{Context, Object, Result, ID};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::ResolverRequest;
use crate::graphql::pagination;
use crate::graphql::projection::FieldOptions;
use crate::graphql::types::Comment;

#[derive(Default)]
pub struct CommentQuery;

#[Object]
impl CommentQuery {
    /// List one post's comments with pagination, oldest first
    async fn comments_by_post(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "ID of the post whose comments to list")] post_id: ID,
        #[graphql(desc = "Maximum number of comments to return")] first: Option<i32>,
        #[graphql(desc = "Number of comments to skip")] offset: Option<i32>,
    ) -> Result<Vec<Comment>> {
        let post_id =
            Uuid::parse_str(&post_id).map_err(|_| ApiError::validation("invalid post id"))?;
        let request = ResolverRequest::from_ctx(ctx, ())?;
        let page = pagination::page(first, offset)?;
        let fields = request.fields(FieldOptions {
            keep: &["id"],
            ..FieldOptions::default()
        });

        let comments = request
            .ctx
            .comments
            .find_page_by_post(post_id, &fields, page.limit, page.offset)
            .await
            .map_err(ApiError::from)?;

        Ok(comments.into_iter().map(Comment::from).collect())
    }
}
