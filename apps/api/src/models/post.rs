//! Post models
//!
//! Database model for posts plus the field-to-column map used when
//! projecting post selections into SELECT lists.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::projected;

/// Maps GraphQL field names onto their `posts` columns.
///
/// The `author` relationship field maps to the foreign key, so selecting the
/// author object pulls `author_id` into the row and the loader takes it from
/// there. `comments` has no column and is deliberately absent.
pub const FIELD_COLUMNS: &[(&str, &str)] = &[
    ("id", "id"),
    ("title", "title"),
    ("content", "content"),
    ("photo", "photo"),
    ("author", "author_id"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// Post from the posts table.
///
/// Fields other than `id` are `None` when left out of the projection.
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique post identifier
    pub id: Uuid,

    /// Post title
    pub title: Option<String>,

    /// Post body
    pub content: Option<String>,

    /// Optional cover photo URL
    pub photo: Option<Option<String>>,

    /// Author foreign key
    pub author_id: Option<Uuid>,

    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl FromRow<'_, PgRow> for Post {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: projected(row, "title")?,
            content: projected(row, "content")?,
            photo: projected(row, "photo")?,
            author_id: projected(row, "author_id")?,
            created_at: projected(row, "created_at")?,
            updated_at: projected(row, "updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_field_maps_to_foreign_key() {
        let column = FIELD_COLUMNS
            .iter()
            .find(|(field, _)| *field == "author")
            .map(|(_, column)| *column);
        assert_eq!(column, Some("author_id"));
    }

    #[test]
    fn test_comments_has_no_column() {
        assert!(FIELD_COLUMNS.iter().all(|(field, _)| *field != "comments"));
    }
}
