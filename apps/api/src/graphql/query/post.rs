//! Post queries
//!
//! - `posts`: page through published posts, newest first
//! - `post`: look up one post by ID

use async_graphql::{Context, Object, Result, ID};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::context::ResolverRequest;
use crate::graphql::pagination;
use crate::graphql::projection::FieldOptions;
use crate::graphql::types::Post;

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// List posts with pagination, newest first
    async fn posts(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Maximum number of posts to return")] first: Option<i32>,
        #[graphql(desc = "Number of posts to skip")] offset: Option<i32>,
    ) -> Result<Vec<Post>> {
        let request = ResolverRequest::from_ctx(ctx, ())?;
        let page = pagination::page(first, offset)?;
        let fields = request.fields(FieldOptions {
            keep: &["id"],
            exclude: &["comments"],
        });

        let posts = request
            .ctx
            .posts
            .find_page(&fields, page.limit, page.offset)
            .await
            .map_err(ApiError::from)?;

        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// Look up a single post by ID.
    ///
    /// The field is nullable so a miss only nulls this field; the error it
    /// records leaves sibling fields of the same request intact.
    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Post>> {
        let post_id =
            Uuid::parse_str(&id).map_err(|_| ApiError::validation("invalid post id"))?;
        let request = ResolverRequest::from_ctx(ctx, ())?;
        let fields = request.fields(FieldOptions {
            keep: &["id"],
            exclude: &["comments"],
        });

        let post = request
            .ctx
            .posts
            .find_by_id(post_id, &fields)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found("post", post_id.to_string()))?;

        Ok(Some(Post::from(post)))
    }
}
