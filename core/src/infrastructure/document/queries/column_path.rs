use sea_orm::sea_query::{Alias, Expr, ExprTrait};
use thiserror::Error;

use crate::domain::collection::{
    entities::{CollectionSchema, FieldKind, FlatField},
    registry::SchemaRegistry,
};
use crate::infrastructure::document::queries::{ColumnKind, JoinEntry, QueryScope, ResolvedColumn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnPathError {
    #[error("empty field path")]
    EmptyPath,

    #[error("unknown field in path: {0}")]
    UnknownField(String),

    #[error("path terminates on group field: {0}")]
    NotALeaf(String),

    #[error("path continues past leaf field: {0}")]
    TrailingSegments(String),

    #[error("relationship targets unknown collection: {0}")]
    UnknownCollection(String),
}

/// Resolve a field path to a concrete table column.
///
/// Both `.` and `__` are accepted as segment separators. Traversal may add
/// joins to the scope: the locales sibling table for localized fields, the
/// target collection's table for relationship paths. Relationship joins are
/// aliased by source column so that two relations onto the same collection
/// (including self-references) stay distinct.
pub fn resolve_column_path(
    registry: &SchemaRegistry,
    schema: &CollectionSchema,
    scope: &mut QueryScope,
    path: &str,
    locale: Option<&str>,
    parent_is_localized: bool,
) -> Result<ResolvedColumn, ColumnPathError> {
    let normalized = path.replace("__", ".");
    let segments: Vec<&str> = normalized.split('.').collect();

    if segments.iter().any(|s| s.is_empty()) {
        return Err(ColumnPathError::EmptyPath);
    }

    resolve_segments(
        registry,
        schema,
        &schema.fields,
        scope,
        schema.table_name(),
        "",
        parent_is_localized,
        &segments,
        path,
        locale,
    )
}

#[allow(clippy::too_many_arguments)]
fn resolve_segments(
    registry: &SchemaRegistry,
    schema: &CollectionSchema,
    fields: &[FlatField],
    scope: &mut QueryScope,
    table: &str,
    prefix: &str,
    parent_is_localized: bool,
    segments: &[&str],
    full_path: &str,
    locale: Option<&str>,
) -> Result<ResolvedColumn, ColumnPathError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Err(ColumnPathError::EmptyPath);
    };

    // System columns exist on every collection table without being declared.
    if rest.is_empty() && prefix.is_empty() && !parent_is_localized {
        match *segment {
            "id" => {
                return Ok(ResolvedColumn {
                    table_name: table.to_string(),
                    column_name: "id".to_string(),
                    kind: ColumnKind::Uuid,
                });
            }
            "created_at" | "updated_at" if schema.timestamps => {
                return Ok(ResolvedColumn {
                    table_name: table.to_string(),
                    column_name: (*segment).to_string(),
                    kind: ColumnKind::Timestamp,
                });
            }
            _ => {}
        }
    }

    let field = fields
        .iter()
        .find(|f| f.name == *segment)
        .ok_or_else(|| ColumnPathError::UnknownField(full_path.to_string()))?;

    let localized = parent_is_localized || field.localized;
    let source_table = if localized {
        let locales_table = schema.locales_table_name();
        scope.add_join(locales_join(table, &locales_table, locale));
        locales_table
    } else {
        table.to_string()
    };

    match &field.kind {
        FieldKind::Group { fields: subfields } => {
            if rest.is_empty() {
                return Err(ColumnPathError::NotALeaf(full_path.to_string()));
            }
            let group_prefix = format!("{prefix}{}_", field.name);
            resolve_segments(
                registry,
                schema,
                subfields,
                scope,
                table,
                &group_prefix,
                localized,
                rest,
                full_path,
                locale,
            )
        }
        FieldKind::Relationship { collection } => {
            let column_name = format!("{prefix}{}_id", field.name);
            if rest.is_empty() {
                return Ok(ResolvedColumn {
                    table_name: source_table,
                    column_name,
                    kind: ColumnKind::Uuid,
                });
            }

            let target = registry
                .get(collection)
                .ok_or_else(|| ColumnPathError::UnknownCollection(collection.clone()))?;
            let target_table = target.table_name().to_string();
            let join_alias = format!("{source_table}__{column_name}");

            scope.add_join(JoinEntry {
                table: target_table,
                alias: Some(join_alias.clone()),
                on: Expr::col((Alias::new(&join_alias), Alias::new("id")))
                    .equals((Alias::new(&source_table), Alias::new(&column_name))),
            });

            resolve_segments(
                registry,
                target.as_ref(),
                &target.fields,
                scope,
                &join_alias,
                "",
                false,
                rest,
                full_path,
                locale,
            )
        }
        scalar => {
            if !rest.is_empty() {
                return Err(ColumnPathError::TrailingSegments(full_path.to_string()));
            }
            Ok(ResolvedColumn {
                table_name: source_table,
                column_name: format!("{prefix}{}", field.name),
                kind: scalar_kind(scalar),
            })
        }
    }
}

fn scalar_kind(kind: &FieldKind) -> ColumnKind {
    match kind {
        FieldKind::Text => ColumnKind::Text,
        FieldKind::Number => ColumnKind::Number,
        FieldKind::Checkbox => ColumnKind::Checkbox,
        FieldKind::Date => ColumnKind::Date,
        FieldKind::Json => ColumnKind::Json,
        FieldKind::Group { .. } | FieldKind::Relationship { .. } => {
            unreachable!("handled before scalar dispatch")
        }
    }
}

fn locales_join(table: &str, locales_table: &str, locale: Option<&str>) -> JoinEntry {
    let mut on = Expr::col((Alias::new(locales_table), Alias::new("_parent_id")))
        .equals((Alias::new(table), Alias::new("id")));

    if let Some(locale) = locale {
        on = on.and(Expr::col((Alias::new(locales_table), Alias::new("_locale"))).eq(locale));
    }

    JoinEntry {
        table: locales_table.to_string(),
        alias: None,
        on,
    }
}
