use crate::application::http::{
    collection::router::CollectionApiDoc, document::router::DocumentApiDoc,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vellum API"
    ),
    nest(
        (path = "/collections", api = CollectionApiDoc),
        (path = "/collections/{slug}/documents", api = DocumentApiDoc),
    )
)]
pub struct ApiDoc;
