use sea_orm::sea_query::{Alias, Expr, Query, SelectStatement};

use crate::domain::{
    collection::{entities::CollectionSchema, registry::SchemaRegistry},
    common::entities::app_errors::CoreError,
    document::value_objects::ListDocumentsInput,
};
use crate::infrastructure::document::queries::{
    OrderByClause, QueryScope, SortOptions, apply_joins, build_order_by, build_where,
};

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// The id page query and its companion count query for one list operation.
#[derive(Debug)]
pub struct BuiltListQuery {
    pub select: SelectStatement,
    pub count: SelectStatement,
    pub offset: u64,
    pub limit: u64,
}

/// Assemble the list query for a collection: resolved filter condition,
/// ordering with tie-break, joins and select columns accumulated as side
/// effects, limit/offset clamped. The select targets ids (plus the columns
/// ordering required); full documents are fetched by id afterwards.
pub fn build_list_query(
    registry: &SchemaRegistry,
    schema: &CollectionSchema,
    input: &ListDocumentsInput,
) -> Result<BuiltListQuery, CoreError> {
    let table = schema.table_name();
    let mut scope = QueryScope::new(table);

    let condition = build_where(
        registry,
        schema,
        &mut scope,
        &input.filter,
        input.locale.as_deref(),
    )?;

    let order_by = build_order_by(
        registry,
        schema,
        &mut scope,
        SortOptions {
            sort: input.sort.clone(),
            locale: input.locale.as_deref(),
            ..Default::default()
        },
    );

    let limit = input.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = input.offset.unwrap_or(0);

    let mut select = Query::select();
    select
        .column((Alias::new(table), Alias::new("id")))
        .from(Alias::new(table));

    for resolved in scope.select_fields.values() {
        if resolved.table_name == table && resolved.column_name == "id" {
            continue;
        }
        select.column(resolved.column_ref());
    }

    apply_joins(&mut select, &scope.joins);
    select.cond_where(condition.clone());

    for clause in &order_by {
        match clause {
            OrderByClause::Column {
                table,
                column,
                order,
            } => {
                select.order_by((Alias::new(table), Alias::new(column)), order.clone());
            }
            OrderByClause::Raw { expr, order } => {
                select.order_by_expr(expr.clone(), order.clone());
            }
        }
    }

    select.limit(limit).offset(offset);

    let mut count = Query::select();
    count
        .expr_as(Expr::cust("COUNT(*)"), Alias::new("total"))
        .from(Alias::new(table));
    apply_joins(&mut count, &scope.joins);
    count.cond_where(condition);

    Ok(BuiltListQuery {
        select,
        count,
        offset,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::PostgresQueryBuilder;

    use super::*;
    use crate::domain::collection::entities::{CollectionSchema, FieldKind, FlatField};
    use crate::domain::document::value_objects::{FilterCondition, FilterOperator, Sort};

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
        ])
        .unwrap()
    }

    fn build(input: ListDocumentsInput) -> BuiltListQuery {
        let registry = registry();
        let schema = registry.get("posts").unwrap();
        build_list_query(&registry, &schema, &input).unwrap()
    }

    #[test]
    fn default_query_orders_by_created_at_desc() {
        let built = build(ListDocumentsInput {
            collection: "posts".to_string(),
            ..Default::default()
        });

        let sql = built.select.to_string(PostgresQueryBuilder);
        assert!(
            sql.contains(r#"ORDER BY "posts"."created_at" DESC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT 20"), "{sql}");
        assert!(sql.contains("OFFSET 0"), "{sql}");
    }

    #[test]
    fn explicit_sort_gets_tie_break_appended() {
        let built = build(ListDocumentsInput {
            collection: "posts".to_string(),
            sort: Some(Sort::One("-title".to_string())),
            ..Default::default()
        });

        let sql = built.select.to_string(PostgresQueryBuilder);
        assert!(
            sql.contains(r#"ORDER BY "posts"."title" DESC, "posts"."created_at" DESC"#),
            "{sql}"
        );
        // The sort column is added to the select list.
        assert!(sql.contains(r#""posts"."title""#), "{sql}");
    }

    #[test]
    fn relationship_sort_joins_once_in_select_and_count() {
        let input = ListDocumentsInput {
            collection: "posts".to_string(),
            sort: Some(Sort::One("author.name".to_string())),
            filter: vec![FilterCondition {
                field: "author.name".to_string(),
                operator: FilterOperator::Like,
                value: "A%".to_string(),
            }],
            ..Default::default()
        };
        let built = build(input);

        let select_sql = built.select.to_string(PostgresQueryBuilder);
        let count_sql = built.count.to_string(PostgresQueryBuilder);

        assert_eq!(select_sql.matches("LEFT JOIN").count(), 1, "{select_sql}");
        assert_eq!(count_sql.matches("LEFT JOIN").count(), 1, "{count_sql}");
        assert!(
            select_sql.contains(r#"LEFT JOIN "users" AS "posts__author_id""#),
            "{select_sql}"
        );
    }

    #[test]
    fn count_query_has_no_ordering_or_pagination() {
        let built = build(ListDocumentsInput {
            collection: "posts".to_string(),
            sort: Some(Sort::One("-title".to_string())),
            ..Default::default()
        });

        let sql = built.count.to_string(PostgresQueryBuilder);
        assert!(!sql.contains("ORDER BY"), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
        assert!(sql.contains("COUNT(*)"), "{sql}");
    }

    #[test]
    fn limit_is_clamped() {
        let built = build(ListDocumentsInput {
            collection: "posts".to_string(),
            limit: Some(10_000),
            offset: Some(40),
            ..Default::default()
        });

        assert_eq!(built.limit, MAX_LIMIT);
        assert_eq!(built.offset, 40);
    }
}
