use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vellum_core::domain::collection::entities::CollectionSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetCollectionResponse {
    pub data: CollectionSchema,
}

#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "collection",
    summary = "Get collection",
    description = "Retrieves one registered collection schema by slug.",
    params(
        ("slug" = String, Path, description = "Collection slug"),
    ),
    responses(
        (status = 200, body = GetCollectionResponse)
    ),
)]
pub async fn get_collection(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Response<GetCollectionResponse>, ApiError> {
    let schema = state
        .registry
        .get(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("unknown collection: {slug}")))?;

    Ok(Response::OK(GetCollectionResponse {
        data: schema.as_ref().clone(),
    }))
}
