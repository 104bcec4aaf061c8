use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use garage_catalog::{Part, Service};
use garage_store::MemoryStore;

use crate::middleware::auth::Claims;
use crate::state::AuthSettings;
use crate::{app, AppState};

const SECRET: &str = "test-secret";

fn token(role: &str, client_id: Option<Uuid>) -> String {
    let claims = Claims {
        sub: "user@test".to_string(),
        role: role.to_string(),
        client_id,
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// State backed by a seeded in-memory store: one service at 80, one part
/// at 10. Returns the catalog ids for building order requests.
async fn test_state() -> (AppState, Uuid, Uuid) {
    let store = Arc::new(MemoryStore::new());
    let service_id = Uuid::new_v4();
    let part_id = Uuid::new_v4();
    store
        .seed_service(Service {
            id: service_id,
            name: "Brake inspection".to_string(),
            unit_price: dec!(80.00),
        })
        .await;
    store
        .seed_part(Part {
            id: part_id,
            name: "Brake pad".to_string(),
            unit_price: dec!(10.00),
            stock: 2,
            min_stock: 4,
        })
        .await;
    let state = AppState {
        orders: store.clone(),
        catalog: store,
        auth: AuthSettings {
            secret: SECRET.to_string(),
        },
    };
    (state, service_id, part_id)
}

async fn send(
    state: &AppState,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn create_body(client_id: Uuid, service_id: Uuid, part_id: Uuid, quantity: u32) -> Value {
    json!({
        "description": "front brakes",
        "clientId": client_id,
        "vehicleId": Uuid::new_v4(),
        "startDate": "2026-08-30T09:00:00Z",
        "serviceIds": [service_id],
        "partSelections": [{"partId": part_id, "quantity": quantity}],
    })
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let (state, _, _) = test_state().await;
    let (status, _) = send(&state, "GET", "/v1/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customers_cannot_use_the_management_surface() {
    let (state, service_id, part_id) = test_state().await;
    let customer = token("CUSTOMER", Some(Uuid::new_v4()));
    let body = create_body(Uuid::new_v4(), service_id, part_id, 1);
    let (status, _) = send(&state, "POST", "/v1/orders", Some(&customer), Some(body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_creates_an_order_and_display_total_is_resolved() {
    let (state, service_id, part_id) = test_state().await;
    let admin = token("ADMIN", None);
    let client_id = Uuid::new_v4();

    let body = create_body(client_id, service_id, part_id, 3);
    let (status, created) = send(&state, "POST", "/v1/orders", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    // service 80 + part 10 x 3
    assert_eq!(created["displayTotal"].as_f64(), Some(110.0));
    assert_eq!(created["status"], "OPEN");

    let order_id = created["id"].as_str().unwrap().to_string();

    // the owning customer sees it, a stranger gets a 404
    let owner = token("CUSTOMER", Some(client_id));
    let (status, fetched) = send(
        &state,
        "GET",
        &format!("/v1/orders/{order_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"].as_str(), Some(order_id.as_str()));

    let stranger = token("CUSTOMER", Some(Uuid::new_v4()));
    let (status, _) = send(
        &state,
        "GET",
        &format!("/v1/orders/{order_id}"),
        Some(&stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn finishing_an_order_over_http_finalizes_it() {
    let (state, service_id, part_id) = test_state().await;
    let admin = token("ADMIN", None);

    let body = create_body(Uuid::new_v4(), service_id, part_id, 2);
    let (_, created) = send(&state, "POST", "/v1/orders", Some(&admin), Some(body)).await;
    let order_id = created["id"].as_str().unwrap().to_string();

    let (status, finished) = send(
        &state,
        "PUT",
        &format!("/v1/orders/{order_id}/status"),
        Some(&admin),
        Some(json!({"status": "FINISHED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finished["status"], "FINISHED");
    // service 80 + part 10 x 2
    assert_eq!(finished["totalValue"].as_f64(), Some(100.0));
    assert!(finished["endDate"].is_string());
}

#[tokio::test]
async fn missing_client_is_a_bad_request() {
    let (state, service_id, _) = test_state().await;
    let admin = token("ADMIN", None);
    let body = json!({
        "description": "no client picked",
        "vehicleId": Uuid::new_v4(),
        "serviceIds": [service_id],
    });
    let (status, error) = send(&state, "POST", "/v1/orders", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("client"));
}

#[tokio::test]
async fn parts_listing_carries_the_low_stock_flag() {
    let (state, _, _) = test_state().await;
    let customer = token("CUSTOMER", Some(Uuid::new_v4()));
    let (status, parts) = send(&state, "GET", "/v1/catalog/parts", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    // seeded with stock 2, min 4
    assert_eq!(parts[0]["lowStock"], json!(true));
}

#[tokio::test]
async fn single_catalog_items_are_fetchable_by_id() {
    let (state, service_id, part_id) = test_state().await;
    let customer = token("CUSTOMER", Some(Uuid::new_v4()));

    let (status, service) = send(
        &state,
        "GET",
        &format!("/v1/catalog/services/{service_id}"),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(service["name"], "Brake inspection");
    assert_eq!(service["unitPrice"].as_f64(), Some(80.0));

    let (status, part) = send(
        &state,
        "GET",
        &format!("/v1/catalog/parts/{part_id}"),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(part["name"], "Brake pad");
    assert_eq!(part["lowStock"], json!(true));
}

#[tokio::test]
async fn unknown_catalog_items_are_a_not_found() {
    let (state, _, _) = test_state().await;
    let customer = token("CUSTOMER", Some(Uuid::new_v4()));
    let (status, _) = send(
        &state,
        "GET",
        &format!("/v1/catalog/parts/{}", Uuid::new_v4()),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
