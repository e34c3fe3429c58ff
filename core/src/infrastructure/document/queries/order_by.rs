use sea_orm::sea_query::Order;
use tracing::debug;

use crate::domain::{
    collection::{entities::CollectionSchema, registry::SchemaRegistry},
    document::value_objects::Sort,
};
use crate::infrastructure::document::queries::{
    OrderByClause, QueryScope, RawSort, resolve_column_path,
};

#[derive(Debug, Default)]
pub struct SortOptions<'a> {
    pub sort: Option<Sort>,
    pub raw_sort: Option<RawSort>,
    pub locale: Option<&'a str>,
    /// Alternate reference for the primary table, for self-referential or
    /// recursive join scenarios. Columns resolved onto the primary table are
    /// emitted against this alias instead.
    pub alias_table: Option<&'a str>,
    /// Set when the fields being sorted sit under a localized ancestor.
    pub parent_is_localized: bool,
}

/// Build the ordering list for a collection query from a sort specification.
///
/// Resolved columns are recorded in the scope's select fields, and any joins
/// they require in its join list. Tokens that fail to resolve are dropped;
/// sorting by an arbitrary caller-supplied path is best effort. A
/// deterministic tie-break key (`created_at` descending when the table has
/// one, else `id` descending) is always present: it doubles as the default
/// when no sort is given, and is appended unless the caller already
/// referenced it in either direction.
pub fn build_order_by(
    registry: &SchemaRegistry,
    schema: &CollectionSchema,
    scope: &mut QueryScope,
    opts: SortOptions<'_>,
) -> Vec<OrderByClause> {
    let fallback = if schema.has_created_at() {
        "-created_at"
    } else {
        "-id"
    };

    let mut tokens = match opts.sort {
        Some(sort) => sort.into_tokens(),
        None => vec![fallback.to_string()],
    };

    let bare_fallback = &fallback[1..];
    if !tokens.iter().any(|t| t == fallback || t == bare_fallback) {
        tokens.push(fallback.to_string());
    }

    let mut order_by = Vec::new();

    for token in &tokens {
        let (property, order) = match token.strip_prefix('-') {
            Some(property) => (property, Order::Desc),
            None => (token.as_str(), Order::Asc),
        };

        match resolve_column_path(
            registry,
            schema,
            scope,
            property,
            opts.locale,
            opts.parent_is_localized,
        ) {
            Ok(resolved) if resolved.kind.is_sortable() => {
                let table = match opts.alias_table {
                    Some(alias) if resolved.table_name == scope.table_name => alias.to_string(),
                    _ => resolved.table_name.clone(),
                };

                let clause = match &opts.raw_sort {
                    Some(raw) => OrderByClause::Raw {
                        expr: raw.expr.clone(),
                        order: raw.order.clone(),
                    },
                    None => OrderByClause::Column {
                        table,
                        column: resolved.column_name.clone(),
                        order,
                    },
                };
                order_by.push(clause);

                scope
                    .select_fields
                    .insert(resolved.column_name.clone(), resolved);
            }
            Ok(resolved) => {
                debug!(token = %token, column = %resolved.column_name, "dropping unsortable sort token");
            }
            Err(err) => {
                debug!(token = %token, error = %err, "dropping unresolvable sort token");
            }
        }
    }

    order_by
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::Expr;

    use super::*;
    use crate::domain::collection::entities::{CollectionSchema, FieldKind, FlatField};

    fn field(name: &str, kind: FieldKind) -> FlatField {
        FlatField {
            name: name.to_string(),
            localized: false,
            kind,
        }
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::build(vec![
            CollectionSchema {
                slug: "posts".to_string(),
                timestamps: true,
                fields: vec![
                    field("title", FieldKind::Text),
                    field("payload", FieldKind::Json),
                    field(
                        "author",
                        FieldKind::Relationship {
                            collection: "users".to_string(),
                        },
                    ),
                ],
            },
            CollectionSchema {
                slug: "users".to_string(),
                timestamps: true,
                fields: vec![field("name", FieldKind::Text)],
            },
            CollectionSchema {
                slug: "events".to_string(),
                timestamps: false,
                fields: vec![field("label", FieldKind::Text)],
            },
        ])
        .unwrap()
    }

    fn order_for(collection: &str, sort: Option<Sort>) -> (Vec<OrderByClause>, QueryScope) {
        let registry = registry();
        let schema = registry.get(collection).unwrap();
        let mut scope = QueryScope::new(schema.table_name());
        let order_by = build_order_by(
            &registry,
            &schema,
            &mut scope,
            SortOptions {
                sort,
                ..Default::default()
            },
        );
        (order_by, scope)
    }

    fn as_column(clause: &OrderByClause) -> (&str, &str, &Order) {
        match clause {
            OrderByClause::Column {
                table,
                column,
                order,
            } => (table, column, order),
            OrderByClause::Raw { .. } => panic!("expected column clause"),
        }
    }

    #[test]
    fn defaults_to_created_at_desc_when_table_has_it() {
        let (order_by, _) = order_for("posts", None);
        assert_eq!(order_by.len(), 1);
        assert_eq!(
            as_column(&order_by[0]),
            ("posts", "created_at", &Order::Desc)
        );
    }

    #[test]
    fn defaults_to_id_desc_without_created_at() {
        let (order_by, _) = order_for("events", None);
        assert_eq!(order_by.len(), 1);
        assert_eq!(as_column(&order_by[0]), ("events", "id", &Order::Desc));
    }

    #[test]
    fn appends_fallback_after_explicit_sort() {
        let (order_by, _) = order_for("posts", Some(Sort::One("-title".to_string())));
        assert_eq!(order_by.len(), 2);
        assert_eq!(as_column(&order_by[0]), ("posts", "title", &Order::Desc));
        assert_eq!(
            as_column(&order_by[1]),
            ("posts", "created_at", &Order::Desc)
        );
    }

    #[test]
    fn does_not_duplicate_fallback_referenced_in_either_direction() {
        let (order_by, _) = order_for(
            "posts",
            Some(Sort::Many(vec![
                "title".to_string(),
                "-created_at".to_string(),
            ])),
        );
        assert_eq!(order_by.len(), 2);
        assert_eq!(as_column(&order_by[0]), ("posts", "title", &Order::Asc));
        assert_eq!(
            as_column(&order_by[1]),
            ("posts", "created_at", &Order::Desc)
        );

        let (order_by, _) = order_for("posts", Some(Sort::One("created_at".to_string())));
        assert_eq!(order_by.len(), 1);
        assert_eq!(
            as_column(&order_by[0]),
            ("posts", "created_at", &Order::Asc)
        );
    }

    #[test]
    fn unresolvable_tokens_are_dropped_without_affecting_the_rest() {
        let (order_by, _) = order_for(
            "posts",
            Some(Sort::Many(vec!["bogus".to_string(), "title".to_string()])),
        );
        assert_eq!(order_by.len(), 2);
        assert_eq!(as_column(&order_by[0]), ("posts", "title", &Order::Asc));
        assert_eq!(
            as_column(&order_by[1]),
            ("posts", "created_at", &Order::Desc)
        );
    }

    #[test]
    fn json_fields_are_not_sortable() {
        let (order_by, _) = order_for("posts", Some(Sort::One("payload".to_string())));
        assert_eq!(order_by.len(), 1);
        assert_eq!(
            as_column(&order_by[0]),
            ("posts", "created_at", &Order::Desc)
        );
    }

    #[test]
    fn double_underscore_paths_sort_like_dotted_ones() {
        let (dotted, _) = order_for("posts", Some(Sort::One("author.name".to_string())));
        let (doubled, _) = order_for("posts", Some(Sort::One("author__name".to_string())));
        assert_eq!(
            as_column(&dotted[0]),
            ("posts__author_id", "name", &Order::Asc)
        );
        assert_eq!(as_column(&dotted[0]), as_column(&doubled[0]));
    }

    #[test]
    fn relationship_sort_records_join_and_select_column() {
        let (_, scope) = order_for("posts", Some(Sort::One("author.name".to_string())));
        assert_eq!(scope.joins.len(), 1);
        assert_eq!(scope.joins[0].table, "users");
        assert!(scope.select_fields.contains_key("name"));
    }

    #[test]
    fn alias_table_substitutes_primary_table_references() {
        let registry = registry();
        let schema = registry.get("posts").unwrap();
        let mut scope = QueryScope::new("posts");
        let order_by = build_order_by(
            &registry,
            &schema,
            &mut scope,
            SortOptions {
                sort: Some(Sort::Many(vec![
                    "title".to_string(),
                    "author.name".to_string(),
                ])),
                alias_table: Some("posts_alias"),
                ..Default::default()
            },
        );

        assert_eq!(
            as_column(&order_by[0]),
            ("posts_alias", "title", &Order::Asc)
        );
        // Joined tables keep their own reference.
        assert_eq!(
            as_column(&order_by[1]),
            ("posts__author_id", "name", &Order::Asc)
        );
        assert_eq!(
            as_column(&order_by[2]),
            ("posts_alias", "created_at", &Order::Desc)
        );
    }

    #[test]
    fn raw_sort_overrides_every_resolved_token() {
        let registry = registry();
        let schema = registry.get("posts").unwrap();
        let mut scope = QueryScope::new("posts");
        let order_by = build_order_by(
            &registry,
            &schema,
            &mut scope,
            SortOptions {
                sort: Some(Sort::Many(vec!["title".to_string(), "bogus".to_string()])),
                raw_sort: Some(RawSort {
                    expr: Expr::cust("LOWER(\"posts\".\"title\")").into(),
                    order: Order::Desc,
                }),
                ..Default::default()
            },
        );

        // title resolves, bogus is dropped, the fallback resolves: two
        // clauses, both carrying the override expression.
        assert_eq!(order_by.len(), 2);
        for clause in &order_by {
            assert!(matches!(clause, OrderByClause::Raw { order, .. } if *order == Order::Desc));
        }
        // Resolution side effects still happen under the override.
        assert!(scope.select_fields.contains_key("title"));
        assert!(scope.select_fields.contains_key("created_at"));
    }
}
