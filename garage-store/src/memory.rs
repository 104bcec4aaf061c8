use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use garage_catalog::{Part, Service};
use garage_core::{CatalogKind, CatalogRepository, OrderRepository, StoreError};

/// In-memory key-value implementation of the persistence collaborator.
///
/// Overwrites are last-write-wins with no versioning, matching the simple
/// key-overwrite semantics of the serverless backend it stands in for.
/// Usage rows only store catalog ids; the referenced catalog item is joined
/// in on every read, so prices are always the live ones.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    services: HashMap<Uuid, Value>,
    parts: HashMap<Uuid, Value>,
    orders: HashMap<Uuid, Value>,
    order_seq: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    pub async fn seed_service(&self, service: Service) {
        let mut inner = self.inner.write().await;
        inner.services.insert(service.id, json!(service));
    }

    pub async fn seed_part(&self, part: Part) {
        let mut inner = self.inner.write().await;
        inner.parts.insert(part.id, json!(part));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreInner {
    /// Clone an order payload with every usage row joined against the
    /// current catalog. A dangling reference simply stays unjoined; readers
    /// tolerate the missing relation.
    fn joined(&self, order: &Value) -> Value {
        let mut out = order.clone();
        if let Some(usages) = out
            .get_mut("servicesPerformed")
            .and_then(Value::as_array_mut)
        {
            for usage in usages {
                let id = usage
                    .get("serviceId")
                    .and_then(Value::as_str)
                    .and_then(|s| Uuid::parse_str(s).ok());
                if let Some(item) = id.and_then(|id| self.services.get(&id)) {
                    usage["service"] = item.clone();
                }
            }
        }
        if let Some(usages) = out.get_mut("partsUsed").and_then(Value::as_array_mut) {
            for usage in usages {
                let id = usage
                    .get("partId")
                    .and_then(Value::as_str)
                    .and_then(|s| Uuid::parse_str(s).ok());
                if let Some(item) = id.and_then(|id| self.parts.get(&id)) {
                    usage["part"] = item.clone();
                }
            }
        }
        out
    }

    fn order_mut(&mut self, id: Uuid) -> Result<&mut Value, StoreError> {
        self.orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// Shallow key merge: every key present in `patch` is written as-is, nulls
/// included. Keys absent from the patch are left untouched, which is what
/// gives the omitted-field semantics of partial updates.
fn apply_patch(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn fetch_catalog(&self, kind: CatalogKind) -> Result<Vec<Value>, StoreError> {
        let inner = self.inner.read().await;
        let map = match kind {
            CatalogKind::Service => &inner.services,
            CatalogKind::Part => &inner.parts,
        };
        let mut items: Vec<Value> = map.values().cloned().collect();
        items.sort_by_key(|v| {
            v.get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        });
        Ok(items)
    }

    async fn fetch_item(&self, kind: CatalogKind, id: Uuid) -> Result<Option<Value>, StoreError> {
        let inner = self.inner.read().await;
        let map = match kind {
            CatalogKind::Service => &inner.services,
            CatalogKind::Part => &inner.parts,
        };
        Ok(map.get(&id).cloned())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create_order(&self, header: &Value) -> Result<Value, StoreError> {
        let mut inner = self.inner.write().await;
        let id = Uuid::new_v4();
        let number = match header.get("number").and_then(Value::as_str) {
            Some(explicit) => {
                let taken = inner
                    .orders
                    .values()
                    .any(|o| o.get("number").and_then(Value::as_str) == Some(explicit));
                if taken {
                    return Err(StoreError::Conflict(format!(
                        "order number {explicit} is already taken"
                    )));
                }
                explicit.to_string()
            }
            None => {
                inner.order_seq += 1;
                format!("OS-{:04}", inner.order_seq)
            }
        };

        let mut order = header.clone();
        apply_patch(
            &mut order,
            &json!({
                "id": id,
                "number": number,
                "createdAt": Utc::now(),
                "servicesPerformed": [],
                "partsUsed": [],
            }),
        );
        tracing::debug!(order_id = %id, number = %number, "order stored");
        inner.orders.insert(id, order.clone());
        Ok(inner.joined(&order))
    }

    async fn fetch_order(&self, id: Uuid) -> Result<Option<Value>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.orders.get(&id).map(|o| inner.joined(o)))
    }

    async fn list_orders(&self, client_id: Option<Uuid>) -> Result<Vec<Value>, StoreError> {
        let inner = self.inner.read().await;
        let mut orders: Vec<&Value> = inner
            .orders
            .values()
            .filter(|order| match client_id {
                Some(client_id) => {
                    order.get("clientId").and_then(Value::as_str)
                        == Some(client_id.to_string().as_str())
                }
                None => true,
            })
            .collect();
        orders.sort_by_key(|order| {
            order
                .get("createdAt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        });
        Ok(orders.into_iter().map(|o| inner.joined(o)).collect())
    }

    async fn attach_service(&self, order_id: Uuid, service_id: Uuid) -> Result<Value, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.services.contains_key(&service_id) {
            return Err(StoreError::NotFound(service_id.to_string()));
        }
        let usage = json!({"id": Uuid::new_v4(), "serviceId": service_id});
        let order = inner.order_mut(order_id)?;
        if let Some(usages) = order
            .get_mut("servicesPerformed")
            .and_then(Value::as_array_mut)
        {
            usages.push(usage.clone());
        }
        Ok(usage)
    }

    async fn attach_part(
        &self,
        order_id: Uuid,
        part_id: Uuid,
        quantity: u32,
    ) -> Result<Value, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.parts.contains_key(&part_id) {
            return Err(StoreError::NotFound(part_id.to_string()));
        }
        let usage = json!({"id": Uuid::new_v4(), "partId": part_id, "quantity": quantity});
        let order = inner.order_mut(order_id)?;
        if let Some(usages) = order.get_mut("partsUsed").and_then(Value::as_array_mut) {
            usages.push(usage.clone());
        }
        Ok(usage)
    }

    async fn update_order(&self, id: Uuid, fields: &Value) -> Result<Value, StoreError> {
        let mut inner = self.inner.write().await;
        let order = inner.order_mut(id)?;
        apply_patch(order, fields);
        let order = order.clone();
        Ok(inner.joined(&order))
    }

    async fn update_order_status(&self, id: Uuid, patch: &Value) -> Result<Value, StoreError> {
        let mut inner = self.inner.write().await;
        let order = inner.order_mut(id)?;
        apply_patch(order, patch);
        let order = order.clone();
        Ok(inner.joined(&order))
    }

    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn store_with_part() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let part_id = Uuid::new_v4();
        store
            .seed_part(Part {
                id: part_id,
                name: "Air filter".to_string(),
                unit_price: dec!(40.00),
                stock: 3,
                min_stock: 1,
            })
            .await;
        (store, part_id)
    }

    #[tokio::test]
    async fn orders_get_ids_and_sequential_numbers() {
        let store = MemoryStore::new();
        let first = store
            .create_order(&json!({"description": "first"}))
            .await
            .unwrap();
        let second = store
            .create_order(&json!({"description": "second"}))
            .await
            .unwrap();
        assert_eq!(first["number"], "OS-0001");
        assert_eq!(second["number"], "OS-0002");
        assert_ne!(first["id"], second["id"]);

        let explicit = store
            .create_order(&json!({"number": "OS-CUSTOM"}))
            .await
            .unwrap();
        assert_eq!(explicit["number"], "OS-CUSTOM");
    }

    #[tokio::test]
    async fn duplicate_explicit_number_is_a_conflict() {
        let store = MemoryStore::new();
        store
            .create_order(&json!({"number": "OS-CUSTOM"}))
            .await
            .unwrap();
        let err = store
            .create_order(&json!({"number": "OS-CUSTOM"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        // generated numbers keep flowing past the taken one
        let next = store.create_order(&json!({})).await.unwrap();
        assert_eq!(next["number"], "OS-0001");
    }

    #[tokio::test]
    async fn reads_join_the_live_catalog_price() {
        let (store, part_id) = store_with_part().await;
        let order = store.create_order(&json!({})).await.unwrap();
        let order_id = Uuid::parse_str(order["id"].as_str().unwrap()).unwrap();
        store.attach_part(order_id, part_id, 2).await.unwrap();

        let fetched = store.fetch_order(order_id).await.unwrap().unwrap();
        assert_eq!(fetched["partsUsed"][0]["part"]["unitPrice"], json!(40.0));

        // catalog edit shows up on the next read, orders are late-bound
        store
            .seed_part(Part {
                id: part_id,
                name: "Air filter".to_string(),
                unit_price: dec!(55.00),
                stock: 3,
                min_stock: 1,
            })
            .await;
        let fetched = store.fetch_order(order_id).await.unwrap().unwrap();
        assert_eq!(fetched["partsUsed"][0]["part"]["unitPrice"], json!(55.0));
    }

    #[tokio::test]
    async fn status_patch_writes_nulls_but_not_omitted_keys() {
        let store = MemoryStore::new();
        let order = store
            .create_order(&json!({"endDate": "2026-01-10T12:00:00Z", "totalValue": 120.0}))
            .await
            .unwrap();
        let order_id = Uuid::parse_str(order["id"].as_str().unwrap()).unwrap();

        let patched = store
            .update_order_status(order_id, &json!({"status": "CANCELED", "totalValue": null}))
            .await
            .unwrap();
        assert!(patched["totalValue"].is_null());
        // endDate was not in the patch, so it must be untouched
        assert_eq!(patched["endDate"], "2026-01-10T12:00:00Z");
    }

    #[tokio::test]
    async fn listing_scopes_by_client() {
        let store = MemoryStore::new();
        let mine = Uuid::new_v4();
        store
            .create_order(&json!({"clientId": mine}))
            .await
            .unwrap();
        store
            .create_order(&json!({"clientId": Uuid::new_v4()}))
            .await
            .unwrap();

        assert_eq!(store.list_orders(None).await.unwrap().len(), 2);
        assert_eq!(store.list_orders(Some(mine)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_twice_reports_not_found() {
        let store = MemoryStore::new();
        let order = store.create_order(&json!({})).await.unwrap();
        let order_id = Uuid::parse_str(order["id"].as_str().unwrap()).unwrap();
        store.delete_order(order_id).await.unwrap();
        assert!(matches!(
            store.delete_order(order_id).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
