use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    document::{
        entities::Document,
        ports::{DocumentRepository, DocumentService},
        value_objects::{
            CreateDocumentInput, DeleteDocumentInput, GetDocumentInput, ListDocumentsInput,
            PagedDocuments, UpdateDocumentInput,
        },
    },
};

impl<D> Service<D>
where
    D: DocumentRepository,
{
    /// Check a requested locale against the configured set, or substitute
    /// the default when none was requested.
    fn resolve_locale(&self, locale: Option<String>) -> Result<Option<String>, CoreError> {
        match locale {
            Some(locale) => {
                if self.localization.locales.iter().any(|l| l == &locale) {
                    Ok(Some(locale))
                } else {
                    Err(CoreError::InvalidQuery(format!("unknown locale: {locale}")))
                }
            }
            None => Ok(Some(self.localization.default_locale.clone())),
        }
    }
}

impl<D> DocumentService for Service<D>
where
    D: DocumentRepository,
{
    async fn list_documents(
        &self,
        mut input: ListDocumentsInput,
    ) -> Result<PagedDocuments, CoreError> {
        let schema = self
            .registry
            .get(&input.collection)
            .ok_or_else(|| CoreError::UnknownCollection(input.collection.clone()))?;

        input.locale = self.resolve_locale(input.locale)?;

        self.document_repository.list_documents(schema, input).await
    }

    async fn get_document(&self, input: GetDocumentInput) -> Result<Option<Document>, CoreError> {
        let schema = self
            .registry
            .get(&input.collection)
            .ok_or_else(|| CoreError::UnknownCollection(input.collection.clone()))?;

        let locale = self.resolve_locale(input.locale)?;

        self.document_repository
            .get_document_by_id(schema, input.document_id, locale)
            .await
    }

    async fn create_document(&self, input: CreateDocumentInput) -> Result<Document, CoreError> {
        let schema = self
            .registry
            .get(&input.collection)
            .ok_or_else(|| CoreError::UnknownCollection(input.collection.clone()))?;

        if !input.data.is_object() {
            return Err(CoreError::InvalidDocument(
                "document data must be an object".to_string(),
            ));
        }

        let locale = self.resolve_locale(input.locale)?;

        self.document_repository
            .create_document(schema, input.data, locale)
            .await
    }

    async fn update_document(&self, input: UpdateDocumentInput) -> Result<Document, CoreError> {
        let schema = self
            .registry
            .get(&input.collection)
            .ok_or_else(|| CoreError::UnknownCollection(input.collection.clone()))?;

        if !input.data.is_object() {
            return Err(CoreError::InvalidDocument(
                "document data must be an object".to_string(),
            ));
        }

        let locale = self.resolve_locale(input.locale)?;

        self.document_repository
            .update_document(schema, input.document_id, input.data, locale)
            .await?
            .ok_or(CoreError::NotFound)
    }

    async fn delete_document(&self, input: DeleteDocumentInput) -> Result<(), CoreError> {
        let schema = self
            .registry
            .get(&input.collection)
            .ok_or_else(|| CoreError::UnknownCollection(input.collection.clone()))?;

        let deleted = self
            .document_repository
            .delete_document(schema, input.document_id)
            .await?;

        if !deleted {
            return Err(CoreError::NotFound);
        }

        Ok(())
    }
}
