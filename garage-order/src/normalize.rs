//! Normalization of raw order payloads into canonical types.
//!
//! Same schema-drift story as the catalog side: several backend generations
//! are still alive, so every logical field resolves against an ordered
//! candidate-key list, first present key wins. Valuation and lifecycle code
//! only ever operate on the canonical [`Order`] produced here; this is the
//! only module that touches raw shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use garage_catalog::normalize::{first_present, normalize_part, normalize_service, PRICE_KEYS};
use garage_core::money;

use crate::models::{Order, OrderStatus, PartUsage, ServiceUsage};

const QUANTITY_KEYS: &[&str] = &["quantity", "qty", "amount", "quantidade"];
const SERVICE_REL_KEYS: &[&str] = &["service", "servico"];
const PART_REL_KEYS: &[&str] = &["part", "peca"];
const SERVICE_USAGE_KEYS: &[&str] = &["servicesPerformed", "services", "servicosRealizados"];
const PART_USAGE_KEYS: &[&str] = &["partsUsed", "parts", "pecasUtilizadas"];
const TOTAL_KEYS: &[&str] = &["totalValue", "total", "valorTotal"];
const START_DATE_KEYS: &[&str] = &["startDate", "dataInicio"];
const END_DATE_KEYS: &[&str] = &["endDate", "dataFim"];
const CLIENT_KEYS: &[&str] = &["clientId", "customerId", "clienteId"];
const VEHICLE_KEYS: &[&str] = &["vehicleId", "veiculoId"];

fn resolve_uuid(value: Option<&Value>) -> Option<Uuid> {
    value
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

fn resolve_date(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

/// Flat price carried directly on a usage row (legacy shape). `Some` only
/// when a price key is actually present; a present-but-garbage value
/// becomes an explicit zero so it cannot inflate a total.
fn resolve_flat_price(usage: &Value) -> Option<Decimal> {
    let raw = first_present(usage, PRICE_KEYS)?;
    if raw.is_null() {
        return None;
    }
    Some(money::decimal_or_zero(raw).max(Decimal::ZERO))
}

/// Three-way quantity resolution: key absent (or null) means "unset, bill
/// one unit" and maps to `None`; a present value is coerced, with anything
/// non-numeric or negative collapsing to an explicit zero.
fn resolve_quantity(usage: &Value) -> Option<Decimal> {
    let raw = first_present(usage, QUANTITY_KEYS)?;
    if raw.is_null() {
        return None;
    }
    let qty = money::finite_decimal(raw).unwrap_or(Decimal::ZERO);
    Some(qty.max(Decimal::ZERO))
}

pub fn normalize_service_usage(value: &Value) -> ServiceUsage {
    let nested = first_present(value, SERVICE_REL_KEYS);
    let service = nested.and_then(normalize_service);
    ServiceUsage {
        id: resolve_uuid(value.get("id")),
        service_id: resolve_uuid(value.get("serviceId"))
            .or_else(|| service.as_ref().map(|s| s.id)),
        service,
        price: resolve_flat_price(value),
    }
}

pub fn normalize_part_usage(value: &Value) -> PartUsage {
    let nested = first_present(value, PART_REL_KEYS);
    let part = nested.and_then(normalize_part);
    PartUsage {
        id: resolve_uuid(value.get("id")),
        part_id: resolve_uuid(value.get("partId")).or_else(|| part.as_ref().map(|p| p.id)),
        part,
        price: resolve_flat_price(value),
        quantity: resolve_quantity(value),
    }
}

fn resolve_usages<T>(order: &Value, keys: &[&str], normalize: impl Fn(&Value) -> T) -> Vec<T> {
    first_present(order, keys)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize).collect())
        .unwrap_or_default()
}

/// Normalize a full order payload. Total function: missing or malformed
/// fields fall back to inert defaults rather than failing, because reads
/// from the store are not trusted to match any single schema generation.
pub fn normalize_order(value: &Value) -> Order {
    let status = value
        .get("status")
        .and_then(Value::as_str)
        .and_then(OrderStatus::parse)
        .unwrap_or(OrderStatus::Open);

    let total_value = first_present(value, TOTAL_KEYS).and_then(money::finite_decimal);

    Order {
        id: resolve_uuid(value.get("id")).unwrap_or(Uuid::nil()),
        number: value
            .get("number")
            .and_then(Value::as_str)
            .map(str::to_string),
        description: value
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        status,
        start_date: resolve_date(first_present(value, START_DATE_KEYS))
            .unwrap_or(DateTime::UNIX_EPOCH),
        end_date: resolve_date(first_present(value, END_DATE_KEYS)),
        observations: value
            .get("observations")
            .and_then(Value::as_str)
            .map(str::to_string),
        client_id: resolve_uuid(first_present(value, CLIENT_KEYS)).unwrap_or(Uuid::nil()),
        vehicle_id: resolve_uuid(first_present(value, VEHICLE_KEYS)).unwrap_or(Uuid::nil()),
        total_value,
        services_performed: resolve_usages(value, SERVICE_USAGE_KEYS, normalize_service_usage),
        parts_used: resolve_usages(value, PART_USAGE_KEYS, normalize_part_usage),
    }
}
