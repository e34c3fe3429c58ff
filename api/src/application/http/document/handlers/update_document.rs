use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use vellum_core::domain::document::entities::Document;
use vellum_core::domain::document::ports::DocumentService;
use vellum_core::domain::document::value_objects::UpdateDocumentInput;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UpdateDocumentQuery {
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UpdateDocumentResponse {
    pub data: Document,
}

#[utoipa::path(
    patch,
    path = "/{document_id}",
    tag = "document",
    summary = "Update document",
    description = "Partially updates a document; only the provided fields change.",
    params(
        ("slug" = String, Path, description = "Collection slug"),
        ("document_id" = Uuid, Path, description = "Document id"),
        UpdateDocumentQuery
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, body = UpdateDocumentResponse)
    ),
)]
pub async fn update_document(
    Path((slug, document_id)): Path<(String, Uuid)>,
    Query(query): Query<UpdateDocumentQuery>,
    State(state): State<AppState>,
    Json(data): Json<JsonValue>,
) -> Result<Response<UpdateDocumentResponse>, ApiError> {
    let document = state
        .service
        .update_document(UpdateDocumentInput {
            collection: slug,
            document_id,
            data,
            locale: query.locale,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(UpdateDocumentResponse { data: document }))
}
