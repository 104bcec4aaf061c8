use axum::{
    extract::{Path, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use garage_catalog::{normalize_part, normalize_service, Part, Service};
use garage_core::{CatalogKind, CatalogRepository};

use crate::error::ApiError;
use crate::middleware::auth::any_auth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartResponse {
    #[serde(flatten)]
    pub part: Part,
    pub low_stock: bool,
}

impl From<Part> for PartResponse {
    fn from(part: Part) -> Self {
        let low_stock = part.is_low_stock();
        Self { part, low_stock }
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/catalog/services", get(list_services))
        .route("/v1/catalog/services/{id}", get(get_service))
        .route("/v1/catalog/parts", get(list_parts))
        .route("/v1/catalog/parts/{id}", get(get_part))
        .route_layer(middleware::from_fn_with_state(state, any_auth))
}

/// GET /v1/catalog/services
async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, ApiError> {
    let raw = state.catalog.fetch_catalog(CatalogKind::Service).await?;
    Ok(Json(raw.iter().filter_map(normalize_service).collect()))
}

/// GET /v1/catalog/services/{id}
async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, ApiError> {
    let raw = state
        .catalog
        .fetch_item(CatalogKind::Service, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    let service = normalize_service(&raw).ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    Ok(Json(service))
}

/// GET /v1/catalog/parts/{id}
async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PartResponse>, ApiError> {
    let raw = state
        .catalog
        .fetch_item(CatalogKind::Part, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    let part = normalize_part(&raw).ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    Ok(Json(part.into()))
}

/// GET /v1/catalog/parts
async fn list_parts(State(state): State<AppState>) -> Result<Json<Vec<PartResponse>>, ApiError> {
    let raw = state.catalog.fetch_catalog(CatalogKind::Part).await?;
    Ok(Json(
        raw.iter()
            .filter_map(normalize_part)
            .map(PartResponse::from)
            .collect(),
    ))
}
