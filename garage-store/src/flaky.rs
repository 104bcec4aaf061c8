use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use garage_core::{OrderRepository, StoreError};

/// Failure-injecting decorator over any order repository, for exercising
/// partial-creation and transport failure paths in tests.
pub struct FaultInjector {
    inner: Arc<dyn OrderRepository>,
    fail_attach_service: bool,
    fail_attach_part: bool,
    fail_update_status: bool,
}

impl FaultInjector {
    pub fn new(inner: Arc<dyn OrderRepository>) -> Self {
        Self {
            inner,
            fail_attach_service: false,
            fail_attach_part: false,
            fail_update_status: false,
        }
    }

    pub fn fail_attach_service(mut self) -> Self {
        self.fail_attach_service = true;
        self
    }

    pub fn fail_attach_part(mut self) -> Self {
        self.fail_attach_part = true;
        self
    }

    pub fn fail_update_status(mut self) -> Self {
        self.fail_update_status = true;
        self
    }

    fn trip(&self, call: &str) -> StoreError {
        StoreError::Transport(format!("injected failure in {call}"))
    }
}

#[async_trait]
impl OrderRepository for FaultInjector {
    async fn create_order(&self, header: &Value) -> Result<Value, StoreError> {
        self.inner.create_order(header).await
    }

    async fn fetch_order(&self, id: Uuid) -> Result<Option<Value>, StoreError> {
        self.inner.fetch_order(id).await
    }

    async fn list_orders(&self, client_id: Option<Uuid>) -> Result<Vec<Value>, StoreError> {
        self.inner.list_orders(client_id).await
    }

    async fn attach_service(&self, order_id: Uuid, service_id: Uuid) -> Result<Value, StoreError> {
        if self.fail_attach_service {
            return Err(self.trip("attach_service"));
        }
        self.inner.attach_service(order_id, service_id).await
    }

    async fn attach_part(
        &self,
        order_id: Uuid,
        part_id: Uuid,
        quantity: u32,
    ) -> Result<Value, StoreError> {
        if self.fail_attach_part {
            return Err(self.trip("attach_part"));
        }
        self.inner.attach_part(order_id, part_id, quantity).await
    }

    async fn update_order(&self, id: Uuid, fields: &Value) -> Result<Value, StoreError> {
        self.inner.update_order(id, fields).await
    }

    async fn update_order_status(&self, id: Uuid, patch: &Value) -> Result<Value, StoreError> {
        if self.fail_update_status {
            return Err(self.trip("update_order_status"));
        }
        self.inner.update_order_status(id, patch).await
    }

    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_order(id).await
    }
}
