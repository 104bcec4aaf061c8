use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use garage_core::AuthContext;
use garage_order::{
    resolve_display_total, Order, OrderHeader, OrderStatus, OrderUpdate, PartSelection,
};

use crate::error::ApiError;
use crate::middleware::auth::any_auth;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub header: OrderHeader,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
    #[serde(default)]
    pub part_selections: Vec<PartSelection>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    /// Explicit stored total when present, computed from usages otherwise.
    pub display_total: Decimal,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let display_total = resolve_display_total(&order);
        Self {
            order,
            display_total,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/orders", post(create_order).get(list_orders))
        .route(
            "/v1/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/v1/orders/{id}/status", put(transition_status))
        .route_layer(middleware::from_fn_with_state(state, any_auth))
}

/// The management surface (everything but reads) is admin-only.
fn require_admin(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "administrator role required".to_string(),
        ))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/orders
async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    require_admin(&auth)?;
    let controller = state.controller(auth);
    let order = controller
        .create_order(req.header, &req.service_ids, &req.part_selections)
        .await?;
    Ok(Json(order.into()))
}

/// GET /v1/orders
async fn list_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let controller = state.controller(auth);
    let orders = controller.list_orders().await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /v1/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let controller = state.controller(auth);
    let order = controller.fetch_order(order_id).await?;
    Ok(Json(order.into()))
}

/// PUT /v1/orders/{id}
async fn update_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_id): Path<Uuid>,
    Json(update): Json<OrderUpdate>,
) -> Result<Json<OrderResponse>, ApiError> {
    require_admin(&auth)?;
    let controller = state.controller(auth);
    let order = controller.update_order_details(order_id, update).await?;
    Ok(Json(order.into()))
}

/// PUT /v1/orders/{id}/status
async fn transition_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    require_admin(&auth)?;
    let controller = state.controller(auth);
    let order = controller.transition_status(order_id, req.status).await?;
    Ok(Json(order.into()))
}

/// DELETE /v1/orders/{id}
async fn delete_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    let controller = state.controller(auth);
    controller.delete_order(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
