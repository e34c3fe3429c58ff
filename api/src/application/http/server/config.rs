use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::http::server::app_state::AppState;

/// Public runtime configuration exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicConfig {
    pub root_path: String,
    pub default_locale: String,
    pub locales: Vec<String>,
}

pub async fn get_config(State(state): State<AppState>) -> Json<PublicConfig> {
    let localization = state.service.localization();

    Json(PublicConfig {
        root_path: state.args.server.root_path.clone(),
        default_locale: localization.default_locale.clone(),
        locales: localization.locales.clone(),
    })
}
