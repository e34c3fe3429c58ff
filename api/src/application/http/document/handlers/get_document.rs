use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use vellum_core::domain::document::entities::Document;
use vellum_core::domain::document::ports::DocumentService;
use vellum_core::domain::document::value_objects::GetDocumentInput;

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetDocumentQuery {
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetDocumentResponse {
    pub data: Document,
}

#[utoipa::path(
    get,
    path = "/{document_id}",
    tag = "document",
    summary = "Get document",
    description = "Retrieves a single document of a collection by id.",
    params(
        ("slug" = String, Path, description = "Collection slug"),
        ("document_id" = Uuid, Path, description = "Document id"),
        GetDocumentQuery
    ),
    responses(
        (status = 200, body = GetDocumentResponse)
    ),
)]
pub async fn get_document(
    Path((slug, document_id)): Path<(String, Uuid)>,
    Query(query): Query<GetDocumentQuery>,
    State(state): State<AppState>,
) -> Result<Response<GetDocumentResponse>, ApiError> {
    let document = state
        .service
        .get_document(GetDocumentInput {
            collection: slug,
            document_id,
            locale: query.locale,
        })
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("document not found".to_string()))?;

    Ok(Response::OK(GetDocumentResponse { data: document }))
}
