use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::domain::collection::entities::{CollectionSchema, FieldKind, FlatField};
use crate::domain::common::entities::app_errors::CoreError;

static VALID_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid identifier regex"));

/// Names the store claims for itself on every table.
const RESERVED_FIELD_NAMES: &[&str] = &["id", "created_at", "updated_at", "_locale", "_parent_id"];

/// The set of collections known to the store. Built once at startup and
/// shared immutably afterwards.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    collections: BTreeMap<String, Arc<CollectionSchema>>,
}

impl SchemaRegistry {
    pub fn build(schemas: Vec<CollectionSchema>) -> Result<Self, CoreError> {
        let mut collections: BTreeMap<String, Arc<CollectionSchema>> = BTreeMap::new();

        for schema in schemas {
            if !VALID_IDENT.is_match(&schema.slug) {
                return Err(CoreError::InvalidSchema(format!(
                    "invalid collection slug: {}",
                    schema.slug
                )));
            }
            if collections.contains_key(&schema.slug) {
                return Err(CoreError::InvalidSchema(format!(
                    "duplicate collection slug: {}",
                    schema.slug
                )));
            }
            validate_fields(&schema.slug, &schema.fields)?;
            collections.insert(schema.slug.clone(), Arc::new(schema));
        }

        let registry = Self { collections };
        registry.validate_relationships()?;

        Ok(registry)
    }

    pub fn get(&self, slug: &str) -> Option<Arc<CollectionSchema>> {
        self.collections.get(slug).cloned()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Arc<CollectionSchema>> {
        self.collections.values()
    }

    fn validate_relationships(&self) -> Result<(), CoreError> {
        fn check(
            registry: &SchemaRegistry,
            slug: &str,
            fields: &[FlatField],
        ) -> Result<(), CoreError> {
            for field in fields {
                match &field.kind {
                    FieldKind::Relationship { collection } => {
                        if registry.collections.get(collection).is_none() {
                            return Err(CoreError::InvalidSchema(format!(
                                "collection {slug}: relationship field {} targets unknown collection {collection}",
                                field.name
                            )));
                        }
                    }
                    FieldKind::Group { fields } => check(registry, slug, fields)?,
                    _ => {}
                }
            }
            Ok(())
        }

        for schema in self.collections.values() {
            check(self, &schema.slug, &schema.fields)?;
        }

        Ok(())
    }
}

fn validate_fields(slug: &str, fields: &[FlatField]) -> Result<(), CoreError> {
    let mut seen = std::collections::BTreeSet::new();

    for field in fields {
        if !VALID_IDENT.is_match(&field.name) {
            return Err(CoreError::InvalidSchema(format!(
                "collection {slug}: invalid field name: {}",
                field.name
            )));
        }
        if RESERVED_FIELD_NAMES.contains(&field.name.as_str()) {
            return Err(CoreError::InvalidSchema(format!(
                "collection {slug}: reserved field name: {}",
                field.name
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(CoreError::InvalidSchema(format!(
                "collection {slug}: duplicate field name: {}",
                field.name
            )));
        }
        if let FieldKind::Group { fields } = &field.kind {
            validate_fields(slug, fields)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field(name: &str) -> FlatField {
        FlatField {
            name: name.to_string(),
            localized: false,
            kind: FieldKind::Text,
        }
    }

    fn schema(slug: &str, fields: Vec<FlatField>) -> CollectionSchema {
        CollectionSchema {
            slug: slug.to_string(),
            timestamps: true,
            fields,
        }
    }

    #[test]
    fn builds_registry_with_valid_schemas() {
        let registry = SchemaRegistry::build(vec![
            schema("posts", vec![text_field("title")]),
            schema("authors", vec![text_field("name")]),
        ])
        .unwrap();

        assert!(registry.get("posts").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn rejects_invalid_slug() {
        let err = SchemaRegistry::build(vec![schema("Posts", vec![])]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSchema(_)));
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let err = SchemaRegistry::build(vec![schema(
            "posts",
            vec![text_field("title"), text_field("title")],
        )])
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSchema(_)));
    }

    #[test]
    fn rejects_reserved_field_names() {
        let err = SchemaRegistry::build(vec![schema("posts", vec![text_field("id")])]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSchema(_)));
    }

    #[test]
    fn rejects_unknown_relationship_target() {
        let err = SchemaRegistry::build(vec![schema(
            "posts",
            vec![FlatField {
                name: "author".to_string(),
                localized: false,
                kind: FieldKind::Relationship {
                    collection: "authors".to_string(),
                },
            }],
        )])
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSchema(_)));
    }
}
