use std::net::SocketAddr;
use std::sync::Arc;

use garage_api::{app, state::AuthSettings, AppState};
use garage_store::MemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garage_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = garage_store::Config::load().expect("failed to load config");
    tracing::info!(
        port = config.server.port,
        currency = %config.business_rules.currency,
        "starting garage api"
    );

    let store = Arc::new(MemoryStore::new());

    let app_state = AppState {
        orders: store.clone(),
        catalog: store,
        auth: AuthSettings {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app(app_state))
        .await
        .expect("server error");
}
