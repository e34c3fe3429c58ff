pub mod create_document;
pub mod delete_document;
pub mod get_document;
pub mod list_documents;
pub mod update_document;
