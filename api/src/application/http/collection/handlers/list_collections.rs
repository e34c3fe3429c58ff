use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vellum_core::domain::collection::entities::CollectionSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ListCollectionsResponse {
    pub data: Vec<CollectionSchema>,
}

#[utoipa::path(
    get,
    path = "",
    tag = "collection",
    summary = "List collections",
    description = "Lists the collection schemas registered with the store.",
    responses(
        (status = 200, body = ListCollectionsResponse)
    ),
)]
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Response<ListCollectionsResponse>, ApiError> {
    let data = state
        .registry
        .schemas()
        .map(|schema| schema.as_ref().clone())
        .collect();

    Ok(Response::OK(ListCollectionsResponse { data }))
}
