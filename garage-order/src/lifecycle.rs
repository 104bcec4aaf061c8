use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use garage_catalog::Catalog;
use garage_core::{AuthContext, CatalogKind, CatalogRepository, OrderRepository, StoreError};

use crate::models::{Order, OrderHeader, OrderStatus, OrderUpdate, PartSelection, StatusUpdate};
use crate::normalize::normalize_order;
use crate::valuation::{compute_form_total, compute_order_total};

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Caught before any repository call; nothing was persisted.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The order header exists, but attaching usages failed afterwards.
    /// No compensating delete is performed; the id names what was created.
    #[error("order {order_id} was created but attaching its usages failed: {source}")]
    PartialCreation {
        order_id: Uuid,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives a service order through its status lifecycle and owns the side
/// effects of creation and finalization.
///
/// Repositories and the caller's identity are injected; the controller
/// holds no ambient state and trusts the store as the single source of
/// truth, re-reading after every mutation instead of patching locally.
pub struct LifecycleController {
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogRepository>,
    auth: AuthContext,
}

impl LifecycleController {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogRepository>,
        auth: AuthContext,
    ) -> Self {
        Self {
            orders,
            catalog,
            auth,
        }
    }

    /// Create an order: persist the header first, then attach each selected
    /// service and part through separate repository calls.
    ///
    /// There is no cross-call transaction. A failure while attaching leaves
    /// the header in place and surfaces as [`LifecycleError::PartialCreation`]
    /// carrying the created id; compensation is the caller's decision.
    pub async fn create_order(
        &self,
        header: OrderHeader,
        service_ids: &[Uuid],
        part_selections: &[PartSelection],
    ) -> Result<Order, LifecycleError> {
        let client_id = header
            .client_id
            .filter(|id| !id.is_nil())
            .ok_or_else(|| LifecycleError::Validation("no client selected".to_string()))?;
        let vehicle_id = header
            .vehicle_id
            .filter(|id| !id.is_nil())
            .ok_or_else(|| LifecycleError::Validation("no vehicle selected".to_string()))?;

        let total_value = match header.total_value {
            Some(explicit) => explicit,
            None => {
                let catalog = self.load_catalog().await?;
                compute_form_total(service_ids, part_selections, &catalog)
            }
        };

        let payload = json!({
            "number": header.number,
            "description": header.description,
            "status": header.status.unwrap_or(OrderStatus::Open),
            "startDate": header.start_date.unwrap_or_else(Utc::now),
            "observations": header.observations,
            "clientId": client_id,
            "vehicleId": vehicle_id,
            "totalValue": total_value,
        });
        let created = self.orders.create_order(&payload).await?;
        let order_id = normalize_order(&created).id;
        tracing::info!(%order_id, subject = %self.auth.subject, "order header created");

        for service_id in service_ids {
            self.orders
                .attach_service(order_id, *service_id)
                .await
                .map_err(|source| LifecycleError::PartialCreation { order_id, source })?;
        }
        for selection in part_selections {
            self.orders
                .attach_part(order_id, selection.part_id, selection.quantity)
                .await
                .map_err(|source| LifecycleError::PartialCreation { order_id, source })?;
        }

        self.reload(order_id).await
    }

    /// Fetch one order, scoped: customers only ever see their own.
    pub async fn fetch_order(&self, id: Uuid) -> Result<Order, LifecycleError> {
        let raw = self
            .orders
            .fetch_order(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let order = normalize_order(&raw);
        if !self.can_see(&order) {
            // hidden, not forbidden: other clients' ids look nonexistent
            return Err(StoreError::NotFound(id.to_string()).into());
        }
        Ok(order)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, LifecycleError> {
        let scope = if self.auth.is_admin() {
            None
        } else {
            match self.auth.client_id {
                Some(client_id) => Some(client_id),
                None => return Ok(Vec::new()),
            }
        };
        let raw = self.orders.list_orders(scope).await?;
        Ok(raw.iter().map(normalize_order).collect())
    }

    /// Full-field update. Usages are immutable after creation, so the
    /// outgoing total is the caller's explicit entry or, failing that, the
    /// computed total over the usages as they stand.
    pub async fn update_order_details(
        &self,
        id: Uuid,
        update: OrderUpdate,
    ) -> Result<Order, LifecycleError> {
        let current = self.fetch_order(id).await?;
        let total_value = update.total_value.unwrap_or_else(|| {
            compute_order_total(&current.services_performed, &current.parts_used)
        });

        let mut fields = serde_json::Map::new();
        if let Some(number) = &update.number {
            fields.insert("number".to_string(), json!(number));
        }
        if let Some(description) = &update.description {
            fields.insert("description".to_string(), json!(description));
        }
        if let Some(status) = update.status {
            fields.insert("status".to_string(), json!(status));
        }
        if let Some(start_date) = update.start_date {
            fields.insert("startDate".to_string(), json!(start_date));
        }
        if let Some(end_date) = update.end_date {
            fields.insert("endDate".to_string(), json!(end_date));
        }
        if let Some(observations) = &update.observations {
            fields.insert("observations".to_string(), json!(observations));
        }
        fields.insert("totalValue".to_string(), json!(total_value));

        let updated = self
            .orders
            .update_order(id, &serde_json::Value::Object(fields))
            .await?;
        Ok(normalize_order(&updated))
    }

    /// Move an order to a new status.
    ///
    /// Reaching FINISHED finalizes the order: total recomputed from the
    /// usages as persisted right now, end date fixed to the call time. Any
    /// other target clears the stored total (`null` on the wire) and omits
    /// the end date key, leaving whatever the store holds untouched. A
    /// previously set end date therefore survives un-finalizing; that
    /// matches the shop's historical behavior and is deliberate.
    ///
    /// Any status is reachable from any status; there is no transition
    /// table.
    pub async fn transition_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, LifecycleError> {
        // a failed read is fatal to this transition attempt
        let current = self.fetch_order(id).await?;
        let patch = finalization_patch(&current, new_status);
        tracing::info!(
            order_id = %id,
            from = ?current.status,
            to = ?new_status,
            "order status transition"
        );
        let updated = self.orders.update_order_status(id, &patch.to_patch()).await?;
        Ok(normalize_order(&updated))
    }

    pub async fn delete_order(&self, id: Uuid) -> Result<(), LifecycleError> {
        self.orders.delete_order(id).await?;
        Ok(())
    }

    async fn reload(&self, id: Uuid) -> Result<Order, LifecycleError> {
        let raw = self
            .orders
            .fetch_order(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(normalize_order(&raw))
    }

    async fn load_catalog(&self) -> Result<Catalog, LifecycleError> {
        let services = self.catalog.fetch_catalog(CatalogKind::Service).await?;
        let parts = self.catalog.fetch_catalog(CatalogKind::Part).await?;
        Ok(Catalog::from_payloads(&services, &parts))
    }

    fn can_see(&self, order: &Order) -> bool {
        self.auth.is_admin() || self.auth.client_id == Some(order.client_id)
    }
}

/// The patch a transition sends, isolated for testability.
pub fn finalization_patch(order: &Order, new_status: OrderStatus) -> StatusUpdate {
    if new_status == OrderStatus::Finished {
        StatusUpdate {
            status: new_status,
            total_value: Some(compute_order_total(
                &order.services_performed,
                &order.parts_used,
            )),
            end_date: Some(Utc::now()),
        }
    } else {
        StatusUpdate {
            status: new_status,
            total_value: None,
            end_date: None,
        }
    }
}
