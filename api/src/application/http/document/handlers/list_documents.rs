use crate::application::http::query_builder::list_documents_input;
use crate::application::http::query_extractor::QueryParamsExtractor;
use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use vellum_core::domain::document::ports::DocumentService;
use vellum_core::domain::document::value_objects::PagedDocuments;

#[utoipa::path(
    get,
    path = "",
    tag = "document",
    summary = "List documents",
    description = "Lists documents of a collection with filtering, sorting and pagination.",
    params(
        ("slug" = String, Path, description = "Collection slug"),
        ("sort" = Option<String>, Query, description = "Comma-separated field paths, `-` prefix for descending"),
        ("locale" = Option<String>, Query, description = "Locale for localized fields"),
        ("offset" = Option<u64>, Query, description = "Rows to skip"),
        ("limit" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses(
        (status = 200, body = PagedDocuments)
    ),
)]
pub async fn list_documents(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    QueryParamsExtractor(params): QueryParamsExtractor,
) -> Result<Response<PagedDocuments>, ApiError> {
    let documents = state
        .service
        .list_documents(list_documents_input(slug, &params))
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(documents))
}
