use sea_orm::sea_query::{Alias, ColumnDef, Index, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{error, info};

use crate::domain::{
    collection::{
        entities::{CollectionSchema, FieldKind, FlatField},
        registry::SchemaRegistry,
    },
    common::entities::app_errors::CoreError,
};

/// Bring the database up to the registered collection set: one table per
/// collection plus a locales sibling where the schema has localized fields.
/// Tables are created if absent; altering existing tables is not attempted.
pub async fn ensure_collections(
    db: &DatabaseConnection,
    registry: &SchemaRegistry,
) -> Result<(), CoreError> {
    let backend = db.get_database_backend();

    for schema in registry.schemas() {
        db.execute(backend.build(&collection_table(schema)))
            .await
            .map_err(|e| {
                error!("Failed to create table for {}: {}", schema.slug, e);
                CoreError::InternalServerError
            })?;

        if schema.has_localized_fields() {
            db.execute(backend.build(&locales_table(schema)))
                .await
                .map_err(|e| {
                    error!("Failed to create locales table for {}: {}", schema.slug, e);
                    CoreError::InternalServerError
                })?;
        }

        info!(collection = %schema.slug, "ensured collection tables");
    }

    Ok(())
}

fn collection_table(schema: &CollectionSchema) -> TableCreateStatement {
    let mut table = Table::create();
    table
        .table(Alias::new(schema.table_name()))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("id")).uuid().not_null().primary_key());

    if schema.timestamps {
        table
            .col(
                ColumnDef::new(Alias::new("created_at"))
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Alias::new("updated_at"))
                    .timestamp_with_time_zone()
                    .not_null(),
            );
    }

    add_field_columns(&mut table, &schema.fields, "", false, false);

    table
}

fn locales_table(schema: &CollectionSchema) -> TableCreateStatement {
    let mut table = Table::create();
    table
        .table(Alias::new(schema.locales_table_name()))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("_parent_id")).uuid().not_null())
        .col(ColumnDef::new(Alias::new("_locale")).text().not_null())
        .primary_key(
            Index::create()
                .col(Alias::new("_parent_id"))
                .col(Alias::new("_locale")),
        );

    add_field_columns(&mut table, &schema.fields, "", false, true);

    table
}

fn add_field_columns(
    table: &mut TableCreateStatement,
    fields: &[FlatField],
    prefix: &str,
    parent_is_localized: bool,
    for_locales: bool,
) {
    for field in fields {
        let localized = parent_is_localized || field.localized;

        if let FieldKind::Group { fields: subfields } = &field.kind {
            let group_prefix = format!("{prefix}{}_", field.name);
            add_field_columns(table, subfields, &group_prefix, localized, for_locales);
            continue;
        }

        if localized != for_locales {
            continue;
        }

        let name = match &field.kind {
            FieldKind::Relationship { .. } => format!("{prefix}{}_id", field.name),
            _ => format!("{prefix}{}", field.name),
        };

        let mut column = ColumnDef::new(Alias::new(name));
        match &field.kind {
            FieldKind::Text => column.text(),
            FieldKind::Number => column.double(),
            FieldKind::Checkbox => column.boolean(),
            FieldKind::Date => column.timestamp_with_time_zone(),
            FieldKind::Json => column.json_binary(),
            FieldKind::Relationship { .. } => column.uuid(),
            FieldKind::Group { .. } => unreachable!("groups handled above"),
        };

        table.col(&mut column);
    }
}
