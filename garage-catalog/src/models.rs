use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A labor item in the shop catalog. Always billed at quantity 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
}

/// A stocked part in the shop catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub stock: i64,
    pub min_stock: i64,
}

impl Part {
    /// Derived, never stored: the restocking alert shown next to a part.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}
