//! Valuation engine for service orders.
//!
//! Every function here is a pure, total function: whatever shape the usages
//! arrived in, valuation returns a finite non-negative amount and never
//! fails. Malformed input has already been coerced by normalization; this
//! module only resolves between price sources and does the arithmetic.

use rust_decimal::Decimal;
use uuid::Uuid;

use garage_catalog::Catalog;
use garage_core::money;

use crate::models::{Order, PartSelection, PartUsage, ServiceUsage};

/// Price of one service usage. Resolution order: the nested service's unit
/// price, else the flat price carried on the usage row, else zero.
/// Services are always quantity 1.
pub fn price_of_service_usage(usage: &ServiceUsage) -> Decimal {
    usage
        .service
        .as_ref()
        .map(|s| s.unit_price)
        .or(usage.price)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

/// Price of one part usage: resolved unit price times quantity. An unset
/// quantity bills one unit; an explicit or coerced zero bills nothing.
pub fn price_of_part_usage(usage: &PartUsage) -> Decimal {
    let unit = usage
        .part
        .as_ref()
        .map(|p| p.unit_price)
        .or(usage.price)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    let quantity = usage.quantity.unwrap_or(Decimal::ONE).max(Decimal::ZERO);
    // overflow collapses that term to zero, never the whole total
    unit.checked_mul(quantity).unwrap_or(Decimal::ZERO)
}

/// Total over persisted usages, rounded to currency precision (2 dp, half
/// away from zero). One malformed usage contributes zero without zeroing
/// out the other terms.
pub fn compute_order_total(services: &[ServiceUsage], parts: &[PartUsage]) -> Decimal {
    let mut total = Decimal::ZERO;
    for usage in services {
        total = total
            .checked_add(price_of_service_usage(usage))
            .unwrap_or(total);
    }
    for usage in parts {
        total = total
            .checked_add(price_of_part_usage(usage))
            .unwrap_or(total);
    }
    money::round_money(total)
}

/// Form-time total while an order is still being composed: usages do not
/// exist yet, only id + quantity selections against the live catalog.
/// Unknown ids contribute zero.
pub fn compute_form_total(
    service_ids: &[Uuid],
    part_selections: &[PartSelection],
    catalog: &Catalog,
) -> Decimal {
    let mut total = Decimal::ZERO;
    for id in service_ids {
        if let Some(service) = catalog.service(id) {
            total = total
                .checked_add(service.unit_price.max(Decimal::ZERO))
                .unwrap_or(total);
        }
    }
    for selection in part_selections {
        if let Some(part) = catalog.part(&selection.part_id) {
            let term = part
                .unit_price
                .max(Decimal::ZERO)
                .checked_mul(Decimal::from(selection.quantity))
                .unwrap_or(Decimal::ZERO);
            total = total.checked_add(term).unwrap_or(total);
        }
    }
    money::round_money(total)
}

/// Total shown for an order: the explicitly stored value wins when present,
/// otherwise the total is computed from the persisted usages. Both paths
/// exist because an admin may override the line-item sum by hand.
pub fn resolve_display_total(order: &Order) -> Decimal {
    match order.total_value {
        Some(stored) => stored,
        None => compute_order_total(&order.services_performed, &order.parts_used),
    }
}
