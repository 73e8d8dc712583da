//! Comment models
//!
//! Database model for comments plus the field-to-column map used when
//! projecting comment selections into SELECT lists.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::projected;

/// Maps GraphQL field names onto their `comments` columns.
///
/// Both relationship fields map to their foreign keys so the loaders have
/// the ids they need whenever the nested objects are selected.
pub const FIELD_COLUMNS: &[(&str, &str)] = &[
    ("id", "id"),
    ("content", "content"),
    ("user", "user_id"),
    ("post", "post_id"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// Comment from the comments table.
///
/// Fields other than `id` are `None` when left out of the projection.
#[derive(Debug, Clone)]
pub struct Comment {
    /// Unique comment identifier
    pub id: Uuid,

    /// Comment body
    pub content: Option<String>,

    /// Commenting user foreign key
    pub user_id: Option<Uuid>,

    /// Commented post foreign key
    pub post_id: Option<Uuid>,

    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl FromRow<'_, PgRow> for Comment {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: projected(row, "content")?,
            user_id: projected(row, "user_id")?,
            post_id: projected(row, "post_id")?,
            created_at: projected(row, "created_at")?,
            updated_at: projected(row, "updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_fields_map_to_foreign_keys() {
        let lookup = |field: &str| {
            FIELD_COLUMNS
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, column)| *column)
        };
        assert_eq!(lookup("user"), Some("user_id"));
        assert_eq!(lookup("post"), Some("post_id"));
    }
}
