use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;

/// Which side of the catalog a read targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Service,
    Part,
}

/// Repository trait for catalog data access.
///
/// Reads return raw JSON payloads: the backend has drifted through several
/// field-name generations, so normalization into canonical types happens in
/// one place on the consumer side, not per repository implementation.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn fetch_catalog(&self, kind: CatalogKind) -> Result<Vec<Value>, StoreError>;

    async fn fetch_item(&self, kind: CatalogKind, id: Uuid) -> Result<Option<Value>, StoreError>;
}

/// Repository trait for service-order data access.
///
/// Write payloads are plain JSON objects as well, because the partial-update
/// contract distinguishes a field set to `null` (clear it) from a field left
/// out of the object entirely (do not touch it).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order header; the store assigns id and order number.
    /// Returns the created order payload.
    async fn create_order(&self, header: &Value) -> Result<Value, StoreError>;

    async fn fetch_order(&self, id: Uuid) -> Result<Option<Value>, StoreError>;

    async fn list_orders(&self, client_id: Option<Uuid>) -> Result<Vec<Value>, StoreError>;

    async fn attach_service(&self, order_id: Uuid, service_id: Uuid) -> Result<Value, StoreError>;

    async fn attach_part(
        &self,
        order_id: Uuid,
        part_id: Uuid,
        quantity: u32,
    ) -> Result<Value, StoreError>;

    /// Full-field update; only the keys present in `fields` are written.
    async fn update_order(&self, id: Uuid, fields: &Value) -> Result<Value, StoreError>;

    /// Narrow status transition: `{status, totalValue, endDate?}`.
    async fn update_order_status(&self, id: Uuid, patch: &Value) -> Result<Value, StoreError>;

    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError>;
}
