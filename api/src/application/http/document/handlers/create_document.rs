use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};
use vellum_core::domain::document::entities::Document;
use vellum_core::domain::document::ports::DocumentService;
use vellum_core::domain::document::value_objects::CreateDocumentInput;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CreateDocumentQuery {
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CreateDocumentResponse {
    pub data: Document,
}

#[utoipa::path(
    post,
    path = "",
    tag = "document",
    summary = "Create document",
    description = "Creates a document in a collection from a field-value object shaped by the collection schema.",
    params(
        ("slug" = String, Path, description = "Collection slug"),
        CreateDocumentQuery
    ),
    request_body = serde_json::Value,
    responses(
        (status = 201, body = CreateDocumentResponse)
    ),
)]
pub async fn create_document(
    Path(slug): Path<String>,
    Query(query): Query<CreateDocumentQuery>,
    State(state): State<AppState>,
    Json(data): Json<JsonValue>,
) -> Result<Response<CreateDocumentResponse>, ApiError> {
    let document = state
        .service
        .create_document(CreateDocumentInput {
            collection: slug,
            data,
            locale: query.locale,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Created(CreateDocumentResponse { data: document }))
}
