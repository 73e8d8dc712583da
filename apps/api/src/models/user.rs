//! User account models
//!
//! This module contains the database models for:
//! - User accounts and their projected row type
//! - Login credentials (the only path that touches the password hash)
//! - JWT claims and the authenticated-caller identity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::projected;

/// Maps GraphQL field names onto their `users` columns.
///
/// Order here is the column order of generated SELECT lists. The password
/// hash is deliberately absent: no projection can reach it.
pub const FIELD_COLUMNS: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("email", "email"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// User account from the users table.
///
/// Fields other than `id` are `None` when the projection that produced this
/// row did not include them.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Display name
    pub name: Option<String>,

    /// Email address (unique)
    pub email: Option<String>,

    /// Account creation timestamp
    pub created_at: Option<DateTime<Utc>>,

    /// Last profile update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: projected(row, "name")?,
            email: projected(row, "email")?,
            created_at: projected(row, "created_at")?,
            updated_at: projected(row, "updated_at")?,
        })
    }
}

/// Login credentials row: id plus password hash, nothing else.
///
/// Only the token mutation fetches this; it never crosses into the GraphQL
/// type layer.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    /// Unique user identifier
    pub id: Uuid,

    /// Argon2 hashed password
    pub password_hash: String,
}

/// Identity of the caller, derived from verified JWT claims.
///
/// Existence of this value means credential verification has already
/// succeeded for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Unique user identifier
    pub id: Uuid,
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,

    /// Issued at timestamp (Unix epoch)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,

    /// Issuer
    #[serde(default = "default_issuer")]
    pub iss: String,

    /// Audience
    #[serde(default = "default_audience")]
    pub aud: String,
}

fn default_issuer() -> String {
    "quill".to_string()
}

fn default_audience() -> String {
    "quill".to_string()
}

impl Claims {
    /// Create new claims for a user
    pub fn new(user_id: Uuid, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            iat: now,
            exp: now + ttl_secs,
            iss: default_issuer(),
            aud: default_audience(),
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_is_expired() {
        let mut claims = Claims::new(Uuid::new_v4(), 3600);
        assert!(!claims.is_expired());

        claims.exp = Utc::now().timestamp() - 1;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_claims_defaults() {
        let claims = Claims::new(Uuid::new_v4(), 3600);
        assert_eq!(claims.iss, "quill");
        assert_eq!(claims.aud, "quill");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_field_columns_never_expose_password_hash() {
        assert!(FIELD_COLUMNS
            .iter()
            .all(|(_, column)| *column != "password_hash"));
    }
}
