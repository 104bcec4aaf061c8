use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use garage_core::{AuthContext, Role};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub role: String,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    pub exp: usize,
}

/// Accepts any valid token (either role) and injects the decoded identity
/// as an [`AuthContext`] request extension.
pub async fn any_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let ctx = authenticate(&state, req.headers())?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, StatusCode> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let role = match token_data.claims.role.as_str() {
        "ADMIN" => Role::Admin,
        "CUSTOMER" => Role::Customer,
        _ => return Err(StatusCode::FORBIDDEN),
    };

    Ok(AuthContext::new(
        token_data.claims.sub,
        token_data.claims.client_id,
        role,
    ))
}
