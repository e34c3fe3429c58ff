use super::handlers::get_collection::{__path_get_collection, get_collection};
use super::handlers::list_collections::{__path_list_collections, list_collections};
use crate::application::http::server::app_state::AppState;

use axum::{Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(list_collections, get_collection))]
pub struct CollectionApiDoc;

pub fn collection_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/collections", state.args.server.root_path),
            get(list_collections),
        )
        .route(
            &format!("{}/collections/{{slug}}", state.args.server.root_path),
            get(get_collection),
        )
}
