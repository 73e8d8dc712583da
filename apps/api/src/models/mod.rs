//! Database models
//!
//! Row types for the relational store. Every projectable column is an
//! `Option` so a row decoded from a projected `SELECT` simply leaves the
//! unfetched fields as `None`; the GraphQL layer turns reads of those into
//! errors instead of fabricating values. Primary keys are always fetched
//! and therefore non-optional.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::Comment;
pub use post::Post;
pub use user::{AuthenticatedUser, Claims, User, UserCredentials};

use sqlx::postgres::PgRow;
use sqlx::Row;

/// Decode a column that may have been left out of the projection.
///
/// `ColumnNotFound` means the projection excluded the column, which is not
/// an error here; any other decode failure is.
pub(crate) fn projected<'r, T>(row: &'r PgRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    match row.try_get::<T, _>(column) {
        Ok(value) => Ok(Some(value)),
        Err(sqlx::Error::ColumnNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
