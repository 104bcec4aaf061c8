use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use garage_core::StoreError;
use garage_order::LifecycleError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    /// Order header exists but usage attachment failed; surfaced as a
    /// generic creation failure, detail goes to the log only.
    PartialCreation,
    Upstream(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::PartialCreation => (
                StatusCode::BAD_GATEWAY,
                "order creation failed".to_string(),
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(err) => {
                tracing::error!("internal server error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(msg) => ApiError::Validation(msg),
            LifecycleError::PartialCreation { order_id, source } => {
                tracing::error!(%order_id, %source, "partial order creation");
                ApiError::PartialCreation
            }
            LifecycleError::Store(store) => store.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(detail) => ApiError::NotFound(detail),
            StoreError::Conflict(detail) => ApiError::Conflict(detail),
            StoreError::Transport(detail) => ApiError::Upstream(detail),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}
