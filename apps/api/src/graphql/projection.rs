//! Field projection
//!
//! Derives the set of storage columns a resolver actually needs from the
//! immediate GraphQL selection, so list queries and batched fetches read
//! only what the client asked for. Projection is shallow: nested selections
//! belong to the resolvers of those nested fields.
//!
//! Field names are never interpolated into SQL. They pass through a
//! per-entity allowlist (`FIELD_COLUMNS` on each model) and only the mapped
//! column names reach the query text, so unknown or hostile field names are
//! simply dropped.

use std::collections::BTreeSet;

use async_graphql::Context;

/// A set of requested GraphQL field names.
///
/// Ordered so the column lists derived from it are deterministic.
pub type FieldSet = BTreeSet<String>;

/// Build a [`FieldSet`] from anything yielding field names.
pub fn field_set<I, S>(names: I) -> FieldSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

/// Adjustments a resolver applies on top of the client's selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldOptions<'a> {
    /// Fields fetched whether or not the client asked for them
    pub keep: &'a [&'a str],

    /// Fields removed even if the client asked for them
    pub exclude: &'a [&'a str],
}

/// Field names selected directly on the current field, aliases resolved
/// to their schema names.
pub fn selected_field_names(ctx: &Context<'_>) -> FieldSet {
    ctx.field()
        .selection_set()
        .map(|field| field.name().to_string())
        .collect()
}

/// Apply keep/exclude adjustments to a selection.
///
/// Keeps are added first, then excludes are removed, so an exclusion wins
/// over a keep of the same name.
pub fn project(selection: &FieldSet, options: FieldOptions<'_>) -> FieldSet {
    let mut fields = selection.clone();
    for name in options.keep {
        fields.insert((*name).to_string());
    }
    for name in options.exclude {
        fields.remove(*name);
    }
    fields
}

/// Render the SELECT list for a projected fetch.
///
/// `columns` is the entity's allowlist in column order; `id` is always
/// included, requested fields not in the allowlist are ignored.
pub fn column_list(columns: &[(&str, &str)], fields: &FieldSet) -> String {
    let mut selected = Vec::with_capacity(fields.len() + 1);
    for (field, column) in columns {
        if *field == "id" || fields.contains(*field) {
            selected.push(*column);
        }
    }
    selected.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{post, user};
    use rstest::rstest;

    #[test]
    fn test_project_keeps_and_excludes() {
        let selection = field_set(["name", "email", "comments"]);
        let options = FieldOptions {
            keep: &["id"],
            exclude: &["comments"],
        };

        let fields = project(&selection, options);

        assert_eq!(fields, field_set(["id", "name", "email"]));
    }

    #[test]
    fn test_project_without_options_is_identity() {
        let selection = field_set(["title", "photo"]);
        let fields = project(&selection, FieldOptions::default());
        assert_eq!(fields, selection);
    }

    #[rstest]
    #[case(&["id"], &[], &["title"], &["id", "title"])]
    // keeping a field already selected changes nothing
    #[case(&["id"], &[], &["id", "title"], &["id", "title"])]
    // excluding a field that was never selected changes nothing
    #[case(&[], &["comments"], &["title"], &["title"])]
    // an exclusion wins over a keep of the same name
    #[case(&["author"], &["author"], &["title"], &["title"])]
    fn test_project_cases(
        #[case] keep: &'static [&'static str],
        #[case] exclude: &'static [&'static str],
        #[case] selection: &'static [&'static str],
        #[case] expected: &'static [&'static str],
    ) {
        let fields = project(&field_set(selection.iter().copied()), FieldOptions { keep, exclude });
        assert_eq!(fields, field_set(expected.iter().copied()));
    }

    #[test]
    fn test_column_list_always_includes_id() {
        let fields = field_set(["name"]);
        assert_eq!(column_list(user::FIELD_COLUMNS, &fields), "id, name");

        let empty = FieldSet::new();
        assert_eq!(column_list(user::FIELD_COLUMNS, &empty), "id");
    }

    #[test]
    fn test_column_list_maps_relationship_to_foreign_key() {
        let fields = field_set(["title", "author"]);
        assert_eq!(
            column_list(post::FIELD_COLUMNS, &fields),
            "id, title, author_id"
        );
    }

    #[test]
    fn test_column_list_ignores_unknown_fields() {
        let fields = field_set(["name", "comments", "id; DROP TABLE users; --"]);
        assert_eq!(column_list(user::FIELD_COLUMNS, &fields), "id, name");
    }

    #[test]
    fn test_column_list_is_deterministic() {
        let a = field_set(["email", "name"]);
        let b = field_set(["name", "email"]);
        assert_eq!(
            column_list(user::FIELD_COLUMNS, &a),
            column_list(user::FIELD_COLUMNS, &b)
        );
    }
}
