use std::sync::Arc;

use garage_core::{AuthContext, CatalogRepository, OrderRepository};
use garage_order::LifecycleController;

#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub auth: AuthSettings,
}

impl AppState {
    /// Controller bound to the authenticated caller; one per request so the
    /// identity travels by value, never through ambient state.
    pub fn controller(&self, auth: AuthContext) -> LifecycleController {
        LifecycleController::new(self.orders.clone(), self.catalog.clone(), auth)
    }
}
