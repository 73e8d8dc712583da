//! Comment repository for centralized database operations
//!
//! All comment-related SQL lives here, following the same projected-read and
//! transaction-scoped-write split as the post repository.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::graphql::projection::{column_list, FieldSet};
use crate::models::comment::{Comment, FIELD_COLUMNS};

/// Columns returned by every mutating statement
const RETURNING: &str = "id, content, user_id, post_id, created_at, updated_at";

/// Repository for comment database operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new CommentRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a page of one post's comments in thread order
    pub async fn find_page_by_post(
        &self,
        post_id: Uuid,
        fields: &FieldSet,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM comments WHERE post_id = $1 ORDER BY created_at, id LIMIT $2 OFFSET $3",
            column_list(FIELD_COLUMNS, fields)
        );
        sqlx::query_as(&sql)
            .bind(post_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// Create a new comment
    ///
    /// Fails with a foreign key violation when the post does not exist;
    /// callers map that onto their not-found handling.
    pub async fn create(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO comments (user_id, post_id, content)
            VALUES ($1, $2, $3)
            RETURNING {RETURNING}
            "#,
        );
        sqlx::query_as(&sql)
            .bind(user_id)
            .bind(post_id)
            .bind(content)
            .fetch_one(&self.pool)
            .await
    }

    /// Lock a comment row and return its owner
    ///
    /// # Returns
    /// * `Ok(Some(user_id))` - The comment exists and is now locked
    /// * `Ok(None)` - No comment with the given ID exists
    pub async fn find_owner_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment_id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM comments WHERE id = $1 FOR UPDATE")
            .bind(comment_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Update a locked comment's body
    ///
    /// Callers must hold the row lock from [`find_owner_for_update`] in the
    /// same transaction.
    pub async fn update_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment_id: Uuid,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {RETURNING}
            "#,
        );
        sqlx::query_as(&sql)
            .bind(comment_id)
            .bind(content)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete a locked comment
    pub async fn delete_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
