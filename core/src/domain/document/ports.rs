use std::sync::Arc;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::{
    collection::entities::CollectionSchema,
    common::entities::app_errors::CoreError,
    document::{
        entities::Document,
        value_objects::{
            CreateDocumentInput, DeleteDocumentInput, GetDocumentInput, ListDocumentsInput,
            PagedDocuments, UpdateDocumentInput,
        },
    },
};

#[cfg_attr(test, mockall::automock)]
pub trait DocumentService: Send + Sync {
    fn list_documents(
        &self,
        input: ListDocumentsInput,
    ) -> impl Future<Output = Result<PagedDocuments, CoreError>> + Send;

    fn get_document(
        &self,
        input: GetDocumentInput,
    ) -> impl Future<Output = Result<Option<Document>, CoreError>> + Send;

    fn create_document(
        &self,
        input: CreateDocumentInput,
    ) -> impl Future<Output = Result<Document, CoreError>> + Send;

    fn update_document(
        &self,
        input: UpdateDocumentInput,
    ) -> impl Future<Output = Result<Document, CoreError>> + Send;

    fn delete_document(
        &self,
        input: DeleteDocumentInput,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait DocumentRepository: Send + Sync {
    fn list_documents(
        &self,
        schema: Arc<CollectionSchema>,
        input: ListDocumentsInput,
    ) -> impl Future<Output = Result<PagedDocuments, CoreError>> + Send;

    fn get_document_by_id(
        &self,
        schema: Arc<CollectionSchema>,
        document_id: Uuid,
        locale: Option<String>,
    ) -> impl Future<Output = Result<Option<Document>, CoreError>> + Send;

    fn create_document(
        &self,
        schema: Arc<CollectionSchema>,
        data: JsonValue,
        locale: Option<String>,
    ) -> impl Future<Output = Result<Document, CoreError>> + Send;

    fn update_document(
        &self,
        schema: Arc<CollectionSchema>,
        document_id: Uuid,
        data: JsonValue,
        locale: Option<String>,
    ) -> impl Future<Output = Result<Option<Document>, CoreError>> + Send;

    fn delete_document(
        &self,
        schema: Arc<CollectionSchema>,
        document_id: Uuid,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;
}
