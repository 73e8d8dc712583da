//! User repository for centralized database operations
//!
//! All user-related SQL lives here. Read queries take a [`FieldSet`] and
//! select only the allowlisted columns it names, so the rows they produce
//! carry exactly what the caller's GraphQL selection needs.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::graphql::projection::{column_list, FieldSet};
use crate::models::user::{User, UserCredentials, FIELD_COLUMNS};

/// Columns returned by every mutating statement
const RETURNING: &str = "id, name, email, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a batch of users by ID with a projected column set
    ///
    /// # Arguments
    /// * `ids` - The user IDs to fetch
    /// * `fields` - GraphQL field names controlling which columns are read
    ///
    /// # Returns
    /// A map from ID to user; IDs without a row are simply absent
    pub async fn fetch_many(
        &self,
        ids: &[Uuid],
        fields: &FieldSet,
    ) -> Result<HashMap<Uuid, User>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = ANY($1)",
            column_list(FIELD_COLUMNS, fields)
        );
        let users: Vec<User> = sqlx::query_as(&sql).bind(ids).fetch_all(&self.pool).await?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Find a user by their unique ID with a projected column set
    pub async fn find_by_id(
        &self,
        user_id: Uuid,
        fields: &FieldSet,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1",
            column_list(FIELD_COLUMNS, fields)
        );
        sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List a page of users with a projected column set
    ///
    /// Ordered by creation time so pages are stable across requests.
    pub async fn find_page(
        &self,
        fields: &FieldSet,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2",
            column_list(FIELD_COLUMNS, fields)
        );
        sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// Find the login credentials for an email address
    ///
    /// The only query that reads `password_hash`; its result type never
    /// reaches the GraphQL layer.
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        sqlx::query_as::<_, UserCredentials>(
            r#"SELECT id, password_hash FROM users WHERE email = $1"#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await
    }

    /// Check if an email address is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
            .bind(email.to_lowercase())
            .fetch_one(&self.pool)
            .await
    }

    /// Create a new user
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `email` - Email address (stored lowercased, must be unique)
    /// * `password_hash` - Pre-hashed password (Argon2id)
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {RETURNING}
            "#,
        );
        sqlx::query_as(&sql)
            .bind(name)
            .bind(email.to_lowercase())
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
    }

    /// Update a user's profile fields, leaving absent fields unchanged
    ///
    /// # Returns
    /// * `Ok(Some(User))` - The updated user
    /// * `Ok(None)` - If no user with the given ID exists
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RETURNING}
            "#,
        );
        sqlx::query_as(&sql)
            .bind(user_id)
            .bind(name)
            .bind(email.map(str::to_lowercase))
            .fetch_optional(&self.pool)
            .await
    }

    /// Replace a user's password hash
    pub async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {RETURNING}
            "#,
        );
        sqlx::query_as(&sql)
            .bind(user_id)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a user account
    ///
    /// # Returns
    /// * `Ok(true)` - If a row was deleted
    /// * `Ok(false)` - If no user with the given ID exists
    pub async fn delete(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
