//! Post repository for centralized database operations
//!
//! All post-related SQL lives here. Read queries are projected through the
//! post column allowlist; the update and delete paths are split into
//! transaction-scoped steps so resolvers can lock the row, check ownership,
//! and write atomically.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::graphql::projection::{column_list, FieldSet};
use crate::models::post::{Post, FIELD_COLUMNS};

/// Columns returned by every mutating statement
const RETURNING: &str = "id, title, content, photo, author_id, created_at, updated_at";

/// Repository for post database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new PostRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a batch of posts by ID with a projected column set
    ///
    /// # Returns
    /// A map from ID to post; IDs without a row are simply absent
    pub async fn fetch_many(
        &self,
        ids: &[Uuid],
        fields: &FieldSet,
    ) -> Result<HashMap<Uuid, Post>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM posts WHERE id = ANY($1)",
            column_list(FIELD_COLUMNS, fields)
        );
        let posts: Vec<Post> = sqlx::query_as(&sql).bind(ids).fetch_all(&self.pool).await?;

        Ok(posts.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Find a post by its unique ID with a projected column set
    pub async fn find_by_id(
        &self,
        post_id: Uuid,
        fields: &FieldSet,
    ) -> Result<Option<Post>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM posts WHERE id = $1",
            column_list(FIELD_COLUMNS, fields)
        );
        sqlx::query_as(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List a page of posts, newest first, with a projected column set
    pub async fn find_page(
        &self,
        fields: &FieldSet,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            column_list(FIELD_COLUMNS, fields)
        );
        sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// List a page of one author's posts, newest first
    pub async fn find_page_by_author(
        &self,
        author_id: Uuid,
        fields: &FieldSet,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM posts WHERE author_id = $1 ORDER BY created_at DESC, id LIMIT $2 OFFSET $3",
            column_list(FIELD_COLUMNS, fields)
        );
        sqlx::query_as(&sql)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// Create a new post
    pub async fn create(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
        photo: Option<&str>,
    ) -> Result<Post, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO posts (author_id, title, content, photo)
            VALUES ($1, $2, $3, $4)
            RETURNING {RETURNING}
            "#,
        );
        sqlx::query_as(&sql)
            .bind(author_id)
            .bind(title)
            .bind(content)
            .bind(photo)
            .fetch_one(&self.pool)
            .await
    }

    /// Lock a post row and return its author
    ///
    /// Uses `FOR UPDATE` so the ownership decision made from the returned
    /// value holds until the surrounding transaction commits or rolls back.
    ///
    /// # Returns
    /// * `Ok(Some(author_id))` - The post exists and is now locked
    /// * `Ok(None)` - No post with the given ID exists
    pub async fn find_author_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        post_id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Update a locked post, leaving absent fields unchanged
    ///
    /// Callers must hold the row lock from [`find_author_for_update`] in the
    /// same transaction.
    pub async fn update_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        post_id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
        photo: Option<&str>,
    ) -> Result<Post, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                photo = COALESCE($4, photo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RETURNING}
            "#,
        );
        sqlx::query_as(&sql)
            .bind(post_id)
            .bind(title)
            .bind(content)
            .bind(photo)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete a locked post
    pub async fn delete_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        post_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
