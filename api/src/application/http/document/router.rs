use super::handlers::create_document::{__path_create_document, create_document};
use super::handlers::delete_document::{__path_delete_document, delete_document};
use super::handlers::get_document::{__path_get_document, get_document};
use super::handlers::list_documents::{__path_list_documents, list_documents};
use super::handlers::update_document::{__path_update_document, update_document};
use crate::application::http::server::app_state::AppState;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    list_documents,
    get_document,
    create_document,
    update_document,
    delete_document
))]
pub struct DocumentApiDoc;

pub fn document_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!(
                "{}/collections/{{slug}}/documents",
                state.args.server.root_path
            ),
            get(list_documents),
        )
        .route(
            &format!(
                "{}/collections/{{slug}}/documents",
                state.args.server.root_path
            ),
            post(create_document),
        )
        .route(
            &format!(
                "{}/collections/{{slug}}/documents/{{document_id}}",
                state.args.server.root_path
            ),
            get(get_document),
        )
        .route(
            &format!(
                "{}/collections/{{slug}}/documents/{{document_id}}",
                state.args.server.root_path
            ),
            patch(update_document),
        )
        .route(
            &format!(
                "{}/collections/{{slug}}/documents/{{document_id}}",
                state.args.server.root_path
            ),
            delete(delete_document),
        )
}
