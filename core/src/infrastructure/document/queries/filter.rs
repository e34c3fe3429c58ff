use chrono::{DateTime, Utc};
use sea_orm::Value;
use sea_orm::sea_query::{ColumnRef, Condition, Expr, ExprTrait, SimpleExpr};
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::domain::{
    collection::{entities::CollectionSchema, registry::SchemaRegistry},
    common::entities::app_errors::CoreError,
    document::value_objects::{FilterCondition, FilterOperator},
};
use crate::infrastructure::document::queries::{ColumnKind, QueryScope, resolve_column_path};

/// Build the where condition for a list query.
///
/// Filter paths resolve through the same machinery as sort tokens, with the
/// same join side effects, but resolution failures are hard errors here: a
/// silently dropped condition would widen the result set.
pub fn build_where(
    registry: &SchemaRegistry,
    schema: &CollectionSchema,
    scope: &mut QueryScope,
    conditions: &[FilterCondition],
    locale: Option<&str>,
) -> Result<Condition, CoreError> {
    let mut condition = Condition::all();

    for filter in conditions {
        let resolved =
            resolve_column_path(registry, schema, scope, &filter.field, locale, false).map_err(
                |err| CoreError::InvalidQuery(format!("cannot filter on {}: {err}", filter.field)),
            )?;

        if resolved.kind == ColumnKind::Json {
            return Err(CoreError::InvalidQuery(format!(
                "cannot filter on json field: {}",
                filter.field
            )));
        }

        condition = condition.add(comparison(resolved.column_ref(), filter, resolved.kind)?);
    }

    Ok(condition)
}

fn comparison(
    column: ColumnRef,
    filter: &FilterCondition,
    kind: ColumnKind,
) -> Result<SimpleExpr, CoreError> {
    let column = Expr::col(column);

    let expr = match filter.operator {
        FilterOperator::Eq => column.eq(parse_value(kind, &filter.value)?),
        FilterOperator::Ne => column.ne(parse_value(kind, &filter.value)?),
        FilterOperator::Gt => column.gt(parse_value(kind, &filter.value)?),
        FilterOperator::Gte => column.gte(parse_value(kind, &filter.value)?),
        FilterOperator::Lt => column.lt(parse_value(kind, &filter.value)?),
        FilterOperator::Lte => column.lte(parse_value(kind, &filter.value)?),
        FilterOperator::In => {
            let values = filter
                .value
                .split(',')
                .map(|part| parse_value(kind, part.trim()))
                .collect::<Result<Vec<Value>, CoreError>>()?;
            column.is_in(values)
        }
        FilterOperator::Like => column.like(filter.value.as_str()),
        FilterOperator::Ilike => column.ilike(filter.value.as_str()),
    };

    Ok(expr)
}

fn parse_value(kind: ColumnKind, raw: &str) -> Result<Value, CoreError> {
    let value = match kind {
        ColumnKind::Text => Value::from(raw),
        ColumnKind::Number => {
            let number: f64 = raw
                .parse()
                .map_err(|_| CoreError::InvalidQuery(format!("not a number: {raw}")))?;
            Value::from(number)
        }
        ColumnKind::Checkbox => {
            let flag: bool = raw
                .parse()
                .map_err(|_| CoreError::InvalidQuery(format!("not a boolean: {raw}")))?;
            Value::from(flag)
        }
        ColumnKind::Date | ColumnKind::Timestamp => {
            let datetime = DateTime::parse_from_rfc3339(raw)
                .map_err(|_| CoreError::InvalidQuery(format!("not an RFC 3339 datetime: {raw}")))?
                .with_timezone(&Utc);
            Value::from(datetime)
        }
        ColumnKind::Uuid => {
            let id = Uuid::parse_str(raw)
                .map_err(|_| CoreError::InvalidQuery(format!("not a uuid: {raw}")))?;
            Value::from(id)
        }
        ColumnKind::Json => {
            return Err(CoreError::InvalidQuery(
                "json fields are not filterable".to_string(),
            ));
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::{Alias, PostgresQueryBuilder, Query};

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
        SchemaRegistry::build(vec![CollectionSchema {
            slug: "posts".to_string(),
            timestamps: true,
            fields: vec![
                field("title", FieldKind::Text),
                field("rating", FieldKind::Number),
                field("published", FieldKind::Checkbox),
                field("payload", FieldKind::Json),
            ],
        }])
        .unwrap()
    }

    fn where_sql(conditions: &[FilterCondition]) -> Result<String, CoreError> {
        let registry = registry();
        let schema = registry.get("posts").unwrap();
        let mut scope = QueryScope::new("posts");
        let condition = build_where(&registry, &schema, &mut scope, conditions, None)?;

        let mut select = Query::select();
        select
            .column((Alias::new("posts"), Alias::new("id")))
            .from(Alias::new("posts"))
            .cond_where(condition);

        Ok(select.to_string(PostgresQueryBuilder))
    }

    fn filter(field: &str, operator: FilterOperator, value: &str) -> FilterCondition {
        FilterCondition {
            field: field.to_string(),
            operator,
            value: value.to_string(),
        }
    }

    #[test]
    fn renders_equality_on_text() {
        let sql = where_sql(&[filter("title", FilterOperator::Eq, "hello")]).unwrap();
        assert!(sql.contains(r#""posts"."title" = 'hello'"#), "{sql}");
    }

    #[test]
    fn renders_numeric_comparison() {
        let sql = where_sql(&[filter("rating", FilterOperator::Gte, "4.5")]).unwrap();
        assert!(sql.contains(r#""posts"."rating" >= 4.5"#), "{sql}");
    }

    #[test]
    fn renders_in_list() {
        let sql = where_sql(&[filter("title", FilterOperator::In, "a, b")]).unwrap();
        assert!(sql.contains(r#""posts"."title" IN ('a', 'b')"#), "{sql}");
    }

    #[test]
    fn renders_case_insensitive_like() {
        let sql = where_sql(&[filter("title", FilterOperator::Ilike, "%rust%")]).unwrap();
        assert!(sql.contains(r#""posts"."title" ILIKE '%rust%'"#), "{sql}");
    }

    #[test]
    fn rejects_bad_numeric_value() {
        let err = where_sql(&[filter("rating", FilterOperator::Gt, "much")]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuery(_)));
    }

    #[test]
    fn rejects_unknown_field() {
        let err = where_sql(&[filter("bogus", FilterOperator::Eq, "x")]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuery(_)));
    }

    #[test]
    fn rejects_json_field() {
        let err = where_sql(&[filter("payload", FilterOperator::Eq, "{}")]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuery(_)));
    }
}
