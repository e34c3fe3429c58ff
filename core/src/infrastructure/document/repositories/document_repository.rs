use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::{Alias, Asterisk, Expr, ExprTrait, OnConflict, Query};
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryResult, Value};
use serde_json::Value as JsonValue;
use tracing::error;
use uuid::Uuid;

use crate::domain::{
    collection::{entities::CollectionSchema, registry::SchemaRegistry},
    common::{entities::app_errors::CoreError, generate_uuid_v7},
    document::{
        entities::Document,
        ports::DocumentRepository,
        value_objects::{ListDocumentsInput, PagedDocuments},
    },
};
use crate::infrastructure::document::{
    mappers::{document_from_row, split_document_data},
    queries::build_list_query,
};

#[derive(Debug, Clone)]
pub struct PostgresDocumentRepository {
    pub db: DatabaseConnection,
    registry: Arc<SchemaRegistry>,
}

impl PostgresDocumentRepository {
    pub fn new(db: DatabaseConnection, registry: Arc<SchemaRegistry>) -> Self {
        Self { db, registry }
    }

    /// Fetch full rows for a page of ids, in the order the ids arrived.
    async fn fetch_documents_by_ids(
        &self,
        schema: &CollectionSchema,
        ids: &[Uuid],
        locale: Option<&str>,
    ) -> Result<Vec<Document>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let backend = self.db.get_database_backend();
        let id_values: Vec<Value> = ids.iter().map(|id| Value::from(*id)).collect();

        let mut select = Query::select();
        select
            .column(Asterisk)
            .from(Alias::new(schema.table_name()))
            .and_where(Expr::col(Alias::new("id")).is_in(id_values.clone()));

        let rows = self
            .db
            .query_all(backend.build(&select))
            .await
            .map_err(|e| {
                error!("Failed to fetch documents: {}", e);
                CoreError::InternalServerError
            })?;

        let mut locales_by_parent: HashMap<Uuid, QueryResult> = HashMap::new();
        if let Some(locale) = locale
            && schema.has_localized_fields()
        {
            let mut locales_select = Query::select();
            locales_select
                .column(Asterisk)
                .from(Alias::new(schema.locales_table_name()))
                .and_where(Expr::col(Alias::new("_parent_id")).is_in(id_values))
                .and_where(Expr::col(Alias::new("_locale")).eq(locale));

            let locales_rows = self
                .db
                .query_all(backend.build(&locales_select))
                .await
                .map_err(|e| {
                    error!("Failed to fetch document locales: {}", e);
                    CoreError::InternalServerError
                })?;

            for row in locales_rows {
                let parent_id: Uuid = row.try_get("", "_parent_id").map_err(|e| {
                    error!("Failed to read locales parent id: {}", e);
                    CoreError::InternalServerError
                })?;
                locales_by_parent.insert(parent_id, row);
            }
        }

        let mut rows_by_id: HashMap<Uuid, QueryResult> = HashMap::new();
        for row in rows {
            let id: Uuid = row.try_get("", "id").map_err(|e| {
                error!("Failed to read document id: {}", e);
                CoreError::InternalServerError
            })?;
            rows_by_id.insert(id, row);
        }

        let mut documents = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(row) = rows_by_id.get(id) {
                documents.push(document_from_row(schema, row, locales_by_parent.get(id))?);
            }
        }

        Ok(documents)
    }

    async fn upsert_locales_row(
        &self,
        schema: &CollectionSchema,
        document_id: Uuid,
        locale: &str,
        columns: Vec<(String, Value)>,
    ) -> Result<(), CoreError> {
        if columns.is_empty() {
            return Ok(());
        }

        let backend = self.db.get_database_backend();

        let mut names: Vec<Alias> = vec![Alias::new("_parent_id"), Alias::new("_locale")];
        let mut values: Vec<Value> = vec![Value::from(document_id), Value::from(locale)];
        for (column, value) in columns {
            names.push(Alias::new(&column));
            values.push(value);
        }
        let update_targets: Vec<Alias> = names[2..].to_vec();

        let mut insert = Query::insert();
        insert
            .into_table(Alias::new(schema.locales_table_name()))
            .columns(names)
            .values(values.into_iter().map(Into::into))
            .map_err(|e| {
                error!("Failed to build locales upsert: {}", e);
                CoreError::InternalServerError
            })?;

        let mut on_conflict = OnConflict::columns([Alias::new("_parent_id"), Alias::new("_locale")]);
        on_conflict.update_columns(update_targets);
        insert.on_conflict(on_conflict);

        self.db
            .execute(backend.build(&insert))
            .await
            .map_err(|e| {
                error!("Failed to upsert document locales: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(())
    }
}

impl DocumentRepository for PostgresDocumentRepository {
    async fn list_documents(
        &self,
        schema: Arc<CollectionSchema>,
        input: ListDocumentsInput,
    ) -> Result<PagedDocuments, CoreError> {
        let built = build_list_query(&self.registry, &schema, &input)?;
        let backend = self.db.get_database_backend();

        let (page_rows, count_row) = futures::try_join!(
            self.db.query_all(backend.build(&built.select)),
            self.db.query_one(backend.build(&built.count)),
        )
        .map_err(|e| {
            error!("Failed to list documents: {}", e);
            CoreError::InternalServerError
        })?;

        let total = count_row
            .and_then(|row| row.try_get::<i64>("", "total").ok())
            .unwrap_or(0) as u64;

        let mut ids = Vec::with_capacity(page_rows.len());
        for row in &page_rows {
            let id: Uuid = row.try_get("", "id").map_err(|e| {
                error!("Failed to read page id: {}", e);
                CoreError::InternalServerError
            })?;
            ids.push(id);
        }

        let documents = self
            .fetch_documents_by_ids(&schema, &ids, input.locale.as_deref())
            .await?;

        Ok(PagedDocuments {
            data: documents,
            total,
            offset: built.offset,
            limit: built.limit,
        })
    }

    async fn get_document_by_id(
        &self,
        schema: Arc<CollectionSchema>,
        document_id: Uuid,
        locale: Option<String>,
    ) -> Result<Option<Document>, CoreError> {
        let documents = self
            .fetch_documents_by_ids(&schema, &[document_id], locale.as_deref())
            .await?;

        Ok(documents.into_iter().next())
    }

    async fn create_document(
        &self,
        schema: Arc<CollectionSchema>,
        data: JsonValue,
        locale: Option<String>,
    ) -> Result<Document, CoreError> {
        let columns = split_document_data(&schema, &data)?;
        let backend = self.db.get_database_backend();

        let document_id = generate_uuid_v7();
        let now = Utc::now();

        let mut names: Vec<Alias> = vec![Alias::new("id")];
        let mut values: Vec<Value> = vec![Value::from(document_id)];
        if schema.timestamps {
            names.push(Alias::new("created_at"));
            names.push(Alias::new("updated_at"));
            values.push(Value::from(now));
            values.push(Value::from(now));
        }
        for (column, value) in columns.main {
            names.push(Alias::new(&column));
            values.push(value);
        }

        let mut insert = Query::insert();
        insert
            .into_table(Alias::new(schema.table_name()))
            .columns(names)
            .values(values.into_iter().map(Into::into))
            .map_err(|e| {
                error!("Failed to build document insert: {}", e);
                CoreError::InternalServerError
            })?;

        self.db
            .execute(backend.build(&insert))
            .await
            .map_err(|e| {
                error!("Failed to create document: {}", e);
                CoreError::InternalServerError
            })?;

        if let Some(locale) = locale.as_deref() {
            self.upsert_locales_row(&schema, document_id, locale, columns.locales)
                .await?;
        }

        self.get_document_by_id(schema, document_id, locale)
            .await?
            .ok_or(CoreError::InternalServerError)
    }

    async fn update_document(
        &self,
        schema: Arc<CollectionSchema>,
        document_id: Uuid,
        data: JsonValue,
        locale: Option<String>,
    ) -> Result<Option<Document>, CoreError> {
        let existing = self
            .get_document_by_id(schema.clone(), document_id, locale.clone())
            .await?;
        if existing.is_none() {
            return Ok(None);
        }

        let columns = split_document_data(&schema, &data)?;
        let backend = self.db.get_database_backend();

        if !columns.main.is_empty() || schema.timestamps {
            let mut update = Query::update();
            update.table(Alias::new(schema.table_name()));
            for (column, value) in columns.main {
                update.value(Alias::new(&column), value);
            }
            if schema.timestamps {
                update.value(Alias::new("updated_at"), Value::from(Utc::now()));
            }
            update.and_where(Expr::col(Alias::new("id")).eq(document_id));

            self.db
                .execute(backend.build(&update))
                .await
                .map_err(|e| {
                    error!("Failed to update document: {}", e);
                    CoreError::InternalServerError
                })?;
        }

        if let Some(locale) = locale.as_deref() {
            self.upsert_locales_row(&schema, document_id, locale, columns.locales)
                .await?;
        }

        self.get_document_by_id(schema, document_id, locale).await
    }

    async fn delete_document(
        &self,
        schema: Arc<CollectionSchema>,
        document_id: Uuid,
    ) -> Result<bool, CoreError> {
        let backend = self.db.get_database_backend();

        if schema.has_localized_fields() {
            let mut delete_locales = Query::delete();
            delete_locales
                .from_table(Alias::new(schema.locales_table_name()))
                .and_where(Expr::col(Alias::new("_parent_id")).eq(document_id));

            self.db
                .execute(backend.build(&delete_locales))
                .await
                .map_err(|e| {
                    error!("Failed to delete document locales: {}", e);
                    CoreError::InternalServerError
                })?;
        }

        let mut delete = Query::delete();
        delete
            .from_table(Alias::new(schema.table_name()))
            .and_where(Expr::col(Alias::new("id")).eq(document_id));

        let result = self
            .db
            .execute(backend.build(&delete))
            .await
            .map_err(|e| {
                error!("Failed to delete document: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(result.rows_affected() > 0)
    }
}
