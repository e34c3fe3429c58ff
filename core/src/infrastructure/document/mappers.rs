use chrono::{DateTime, Utc};
use sea_orm::{QueryResult, Value};
use serde_json::{Map, Value as JsonValue};
use tracing::error;
use uuid::Uuid;

use crate::domain::{
    collection::entities::{CollectionSchema, FieldKind, FlatField},
    common::entities::app_errors::CoreError,
    document::entities::Document,
};

/// Rebuild a document from its main-table row and, when a locale was
/// requested, the matching locales row. Group fields nest back into
/// objects; localized values absent for the locale come back as null.
pub fn document_from_row(
    schema: &CollectionSchema,
    row: &QueryResult,
    locales_row: Option<&QueryResult>,
) -> Result<Document, CoreError> {
    let id: Uuid = row.try_get("", "id").map_err(|e| {
        error!("Failed to read document id: {}", e);
        CoreError::InternalServerError
    })?;

    let (created_at, updated_at) = if schema.timestamps {
        let created_at: DateTime<Utc> = row.try_get("", "created_at").map_err(|e| {
            error!("Failed to read created_at: {}", e);
            CoreError::InternalServerError
        })?;
        let updated_at: DateTime<Utc> = row.try_get("", "updated_at").map_err(|e| {
            error!("Failed to read updated_at: {}", e);
            CoreError::InternalServerError
        })?;
        (Some(created_at), Some(updated_at))
    } else {
        (None, None)
    };

    let mut data = Map::new();
    collect_fields(&mut data, &schema.fields, "", false, row, locales_row)?;

    Ok(Document {
        id,
        collection: schema.slug.clone(),
        data: JsonValue::Object(data),
        created_at,
        updated_at,
    })
}

fn collect_fields(
    out: &mut Map<String, JsonValue>,
    fields: &[FlatField],
    prefix: &str,
    parent_is_localized: bool,
    row: &QueryResult,
    locales_row: Option<&QueryResult>,
) -> Result<(), CoreError> {
    for field in fields {
        let localized = parent_is_localized || field.localized;

        if let FieldKind::Group { fields: subfields } = &field.kind {
            let group_prefix = format!("{prefix}{}_", field.name);
            let mut nested = Map::new();
            collect_fields(&mut nested, subfields, &group_prefix, localized, row, locales_row)?;
            out.insert(field.name.clone(), JsonValue::Object(nested));
            continue;
        }

        let source = if localized { locales_row } else { Some(row) };
        let value = match source {
            Some(source) => read_scalar(source, prefix, field)?,
            None => JsonValue::Null,
        };
        out.insert(field.name.clone(), value);
    }

    Ok(())
}

fn read_scalar(row: &QueryResult, prefix: &str, field: &FlatField) -> Result<JsonValue, CoreError> {
    let column = match &field.kind {
        FieldKind::Relationship { .. } => format!("{prefix}{}_id", field.name),
        _ => format!("{prefix}{}", field.name),
    };

    let value = match &field.kind {
        FieldKind::Text => row
            .try_get::<Option<String>>("", &column)
            .map(|v| v.map_or(JsonValue::Null, JsonValue::String)),
        FieldKind::Number => row
            .try_get::<Option<f64>>("", &column)
            .map(|v| v.map_or(JsonValue::Null, |n| serde_json::json!(n))),
        FieldKind::Checkbox => row
            .try_get::<Option<bool>>("", &column)
            .map(|v| v.map_or(JsonValue::Null, JsonValue::Bool)),
        FieldKind::Date => row
            .try_get::<Option<DateTime<Utc>>>("", &column)
            .map(|v| v.map_or(JsonValue::Null, |dt| JsonValue::String(dt.to_rfc3339()))),
        FieldKind::Json => row
            .try_get::<Option<JsonValue>>("", &column)
            .map(|v| v.unwrap_or(JsonValue::Null)),
        FieldKind::Relationship { .. } => row
            .try_get::<Option<Uuid>>("", &column)
            .map(|v| v.map_or(JsonValue::Null, |id| JsonValue::String(id.to_string()))),
        FieldKind::Group { .. } => unreachable!("groups handled by collect_fields"),
    };

    value.map_err(|e| {
        error!("Failed to read column {}: {}", column, e);
        CoreError::InternalServerError
    })
}

/// Column/value pairs for a document write, split by target table.
#[derive(Debug, Default)]
pub struct WriteColumns {
    pub main: Vec<(String, Value)>,
    pub locales: Vec<(String, Value)>,
}

/// Flatten document data into column values: group objects map to prefixed
/// columns, localized values split off to the locales table. Keys not in
/// the schema and values of the wrong shape are rejected.
pub fn split_document_data(
    schema: &CollectionSchema,
    data: &JsonValue,
) -> Result<WriteColumns, CoreError> {
    let object = data.as_object().ok_or_else(|| {
        CoreError::InvalidDocument("document data must be an object".to_string())
    })?;

    let mut out = WriteColumns::default();
    split_fields(&schema.fields, "", false, object, &mut out)?;

    Ok(out)
}

fn split_fields(
    fields: &[FlatField],
    prefix: &str,
    parent_is_localized: bool,
    object: &Map<String, JsonValue>,
    out: &mut WriteColumns,
) -> Result<(), CoreError> {
    for key in object.keys() {
        if !fields.iter().any(|f| f.name == *key) {
            return Err(CoreError::InvalidDocument(format!("unknown field: {key}")));
        }
    }

    for field in fields {
        let Some(value) = object.get(&field.name) else {
            continue;
        };
        let localized = parent_is_localized || field.localized;

        match &field.kind {
            FieldKind::Group { fields: subfields } => {
                let group_prefix = format!("{prefix}{}_", field.name);
                if value.is_null() {
                    null_fill(subfields, &group_prefix, localized, out);
                    continue;
                }
                let nested = value.as_object().ok_or_else(|| {
                    CoreError::InvalidDocument(format!("field {} must be an object", field.name))
                })?;
                split_fields(subfields, &group_prefix, localized, nested, out)?;
            }
            kind => {
                let column = match kind {
                    FieldKind::Relationship { .. } => format!("{prefix}{}_id", field.name),
                    _ => format!("{prefix}{}", field.name),
                };
                let converted = write_value(kind, &field.name, value)?;
                if localized {
                    out.locales.push((column, converted));
                } else {
                    out.main.push((column, converted));
                }
            }
        }
    }

    Ok(())
}

/// Setting a group to null nulls every column it owns.
fn null_fill(fields: &[FlatField], prefix: &str, parent_is_localized: bool, out: &mut WriteColumns) {
    for field in fields {
        let localized = parent_is_localized || field.localized;
        match &field.kind {
            FieldKind::Group { fields: subfields } => {
                let group_prefix = format!("{prefix}{}_", field.name);
                null_fill(subfields, &group_prefix, localized, out);
            }
            kind => {
                let column = match kind {
                    FieldKind::Relationship { .. } => format!("{prefix}{}_id", field.name),
                    _ => format!("{prefix}{}", field.name),
                };
                let value = null_value(kind);
                if localized {
                    out.locales.push((column, value));
                } else {
                    out.main.push((column, value));
                }
            }
        }
    }
}

fn write_value(kind: &FieldKind, name: &str, value: &JsonValue) -> Result<Value, CoreError> {
    if value.is_null() {
        return Ok(null_value(kind));
    }

    let converted = match kind {
        FieldKind::Text => value
            .as_str()
            .map(Value::from)
            .ok_or_else(|| CoreError::InvalidDocument(format!("field {name} must be a string")))?,
        FieldKind::Number => value
            .as_f64()
            .map(Value::from)
            .ok_or_else(|| CoreError::InvalidDocument(format!("field {name} must be a number")))?,
        FieldKind::Checkbox => value
            .as_bool()
            .map(Value::from)
            .ok_or_else(|| CoreError::InvalidDocument(format!("field {name} must be a boolean")))?,
        FieldKind::Date => {
            let raw = value.as_str().ok_or_else(|| {
                CoreError::InvalidDocument(format!("field {name} must be a datetime string"))
            })?;
            let datetime = DateTime::parse_from_rfc3339(raw)
                .map_err(|_| {
                    CoreError::InvalidDocument(format!(
                        "field {name} must be an RFC 3339 datetime"
                    ))
                })?
                .with_timezone(&Utc);
            Value::from(datetime)
        }
        FieldKind::Json => Value::from(value.clone()),
        FieldKind::Relationship { .. } => {
            let raw = value.as_str().ok_or_else(|| {
                CoreError::InvalidDocument(format!("field {name} must be a document id"))
            })?;
            let id = Uuid::parse_str(raw).map_err(|_| {
                CoreError::InvalidDocument(format!("field {name} must be a document id"))
            })?;
            Value::from(id)
        }
        FieldKind::Group { .. } => unreachable!("groups handled by split_fields"),
    };

    Ok(converted)
}

fn null_value(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Text => Value::String(None),
        FieldKind::Number => Value::Double(None),
        FieldKind::Checkbox => Value::Bool(None),
        FieldKind::Date => Value::ChronoDateTimeUtc(None),
        FieldKind::Json => Value::Json(None),
        FieldKind::Relationship { .. } => Value::Uuid(None),
        FieldKind::Group { .. } => unreachable!("groups have no column"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn field(name: &str, kind: FieldKind) -> FlatField {
        FlatField {
            name: name.to_string(),
            localized: false,
            kind,
        }
    }

    fn schema() -> CollectionSchema {
        CollectionSchema {
            slug: "posts".to_string(),
            timestamps: true,
            fields: vec![
                field("title", FieldKind::Text),
                field("rating", FieldKind::Number),
                FlatField {
                    name: "summary".to_string(),
                    localized: true,
                    kind: FieldKind::Text,
                },
                field(
                    "meta",
                    FieldKind::Group {
                        fields: vec![field("headline", FieldKind::Text)],
                    },
                ),
                field(
                    "author",
                    FieldKind::Relationship {
                        collection: "users".to_string(),
                    },
                ),
            ],
        }
    }

    #[test]
    fn splits_localized_values_from_main_columns() {
        let columns = split_document_data(
            &schema(),
            &json!({"title": "hello", "summary": "hallo", "rating": 4.5}),
        )
        .unwrap();

        let main: Vec<&str> = columns.main.iter().map(|(c, _)| c.as_str()).collect();
        let locales: Vec<&str> = columns.locales.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(main, vec!["title", "rating"]);
        assert_eq!(locales, vec!["summary"]);
    }

    #[test]
    fn flattens_group_fields_to_prefixed_columns() {
        let columns =
            split_document_data(&schema(), &json!({"meta": {"headline": "big"}})).unwrap();
        assert_eq!(columns.main[0].0, "meta_headline");
    }

    #[test]
    fn null_group_nulls_all_its_columns() {
        let columns = split_document_data(&schema(), &json!({"meta": null})).unwrap();
        assert_eq!(columns.main[0], ("meta_headline".to_string(), Value::String(None)));
    }

    #[test]
    fn relationship_values_parse_as_document_ids() {
        let id = Uuid::nil().to_string();
        let columns = split_document_data(&schema(), &json!({"author": id})).unwrap();
        assert_eq!(columns.main[0].0, "author_id");

        let err = split_document_data(&schema(), &json!({"author": "not-a-uuid"})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDocument(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = split_document_data(&schema(), &json!({"bogus": 1})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDocument(_)));
    }

    #[test]
    fn rejects_mistyped_values() {
        let err = split_document_data(&schema(), &json!({"rating": "high"})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDocument(_)));
    }
}

