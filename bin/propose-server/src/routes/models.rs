//! Model catalog.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use propose_types::models::catalog;
use propose_types::{ModelInfo, ModelListResponse};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(list_models), components(schemas(ModelInfo, ModelListResponse)))]
pub struct ModelsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/models", get(list_models))
}

/// List the selectable generation models (`GET /models`).
///
/// `default_model` reflects the server configuration, which may name a
/// model outside the catalog.
#[utoipa::path(
    get,
    path = "/models",
    tag = "models",
    responses(
        (status = 200, description = "Selectable models", body = ModelListResponse)
    )
)]
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelListResponse> {
    Json(ModelListResponse {
        object: "list".to_owned(),
        default_model: state.pipeline.options().default_model.clone(),
        data: catalog(),
    })
}
