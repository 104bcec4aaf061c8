//! Single normalization pass from heterogeneous backend payloads into
//! canonical catalog types.
//!
//! The backend has gone through several schema generations and older rows
//! still surface legacy field names (including Portuguese-era keys). Each
//! logical field is resolved against an ordered candidate list; the first
//! present key wins. Nothing past this module ever sees a raw payload.

use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use garage_core::money;

use crate::models::{Part, Service};

pub const PRICE_KEYS: &[&str] = &["price", "unitPrice", "value", "preco", "valor"];
pub const NAME_KEYS: &[&str] = &["name", "nome", "description"];
pub const STOCK_KEYS: &[&str] = &["stock", "quantity", "estoque"];
pub const MIN_STOCK_KEYS: &[&str] = &["minStock", "minimumStock", "estoqueMinimo"];

/// First candidate key present on `value`, if `value` is an object.
pub fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = value.as_object()?;
    keys.iter().find_map(|k| obj.get(*k))
}

pub fn resolve_id(value: &Value) -> Uuid {
    value
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or(Uuid::nil())
}

fn resolve_name(value: &Value) -> String {
    first_present(value, NAME_KEYS)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Unit price off a catalog payload; malformed or missing prices become 0,
/// negatives are clamped (a price can never reduce a total).
pub fn resolve_unit_price(value: &Value) -> Decimal {
    let price = first_present(value, PRICE_KEYS)
        .map(money::decimal_or_zero)
        .unwrap_or(Decimal::ZERO);
    price.max(Decimal::ZERO)
}

pub fn normalize_service(value: &Value) -> Option<Service> {
    if !value.is_object() {
        return None;
    }
    Some(Service {
        id: resolve_id(value),
        name: resolve_name(value),
        unit_price: resolve_unit_price(value),
    })
}

pub fn normalize_part(value: &Value) -> Option<Part> {
    if !value.is_object() {
        return None;
    }
    let stock = first_present(value, STOCK_KEYS)
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let min_stock = first_present(value, MIN_STOCK_KEYS)
        .and_then(Value::as_i64)
        .unwrap_or(0);
    Some(Part {
        id: resolve_id(value),
        name: resolve_name(value),
        unit_price: resolve_unit_price(value),
        stock,
        min_stock,
    })
}
