use chrono::{DateTime, Utc};
use garage_catalog::{Part, Service};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service-order status, as the exact wire literals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    InProgress,
    Finished,
    Canceled,
}

impl OrderStatus {
    /// Parse one of the four case-sensitive wire literals.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(OrderStatus::Open),
            "IN_PROGRESS" => Some(OrderStatus::InProgress),
            "FINISHED" => Some(OrderStatus::Finished),
            "CANCELED" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }
}

/// Canonical join record linking an order to a catalog service.
///
/// The nested service may be missing (the backend sometimes returns the
/// relation unpopulated) and older rows carry a flat price directly on the
/// usage; valuation resolves between the two.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUsage {
    pub id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub service: Option<Service>,
    pub price: Option<Decimal>,
}

/// Canonical join record linking an order to a catalog part.
///
/// `quantity` keeps its three-way meaning from intake: `None` means the
/// field was absent (bill one unit), `Some(0)` means an explicit or
/// unusable value (bill nothing), anything else multiplies the unit price.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartUsage {
    pub id: Option<Uuid>,
    pub part_id: Option<Uuid>,
    pub part: Option<Part>,
    pub price: Option<Decimal>,
    pub quantity: Option<Decimal>,
}

/// Canonical service order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub number: Option<String>,
    pub description: String,
    pub status: OrderStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    /// Explicitly stored total, when one was ever entered or finalized.
    /// Display logic falls back to computing from usages when absent.
    pub total_value: Option<Decimal>,
    pub services_performed: Vec<ServiceUsage>,
    pub parts_used: Vec<PartUsage>,
}

/// Creation-time header, before the store has assigned an id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHeader {
    pub number: Option<String>,
    pub description: String,
    pub status: Option<OrderStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub client_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub total_value: Option<Decimal>,
}

/// A part picked on the creation form: id plus user-entered quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartSelection {
    pub part_id: Uuid,
    pub quantity: u32,
}

/// Full-field order update. Usages are immutable after creation; none of
/// these fields touch them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub number: Option<String>,
    pub description: Option<String>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub total_value: Option<Decimal>,
}

/// Partial-update payload for a status transition.
///
/// `total_value` always serializes, so `None` crosses the wire as `null`
/// and clears the stored value. `end_date` is skipped entirely when absent:
/// an omitted key tells the store to leave the field alone. The null/omit
/// distinction is load-bearing; see `transition_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub total_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl StatusUpdate {
    /// Wire payload for the partial update. Keeps the serde semantics:
    /// `totalValue` is always a key (possibly null), `endDate` only appears
    /// when finalization set one.
    pub fn to_patch(&self) -> serde_json::Value {
        let mut patch = serde_json::json!({
            "status": self.status,
            "totalValue": self.total_value,
        });
        if let Some(end_date) = self.end_date {
            patch["endDate"] = serde_json::json!(end_date);
        }
        patch
    }
}
