use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("resource not found")]
    NotFound,

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid document data: {0}")]
    InvalidDocument(String),

    #[error("invalid collection schema: {0}")]
    InvalidSchema(String),

    #[error("internal server error")]
    InternalServerError,
}
