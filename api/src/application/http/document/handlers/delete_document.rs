use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use uuid::Uuid;
use vellum_core::domain::document::ports::DocumentService;
use vellum_core::domain::document::value_objects::DeleteDocumentInput;

#[utoipa::path(
    delete,
    path = "/{document_id}",
    tag = "document",
    summary = "Delete document",
    description = "Deletes a document and its localized values.",
    params(
        ("slug" = String, Path, description = "Collection slug"),
        ("document_id" = Uuid, Path, description = "Document id"),
    ),
    responses(
        (status = 204)
    ),
)]
pub async fn delete_document(
    Path((slug, document_id)): Path<(String, Uuid)>,
    State(state): State<AppState>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .delete_document(DeleteDocumentInput {
            collection: slug,
            document_id,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::NoContent)
}
