use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Round to currency precision (2 decimal places, half away from zero).
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a monetary value out of a loosely-typed JSON field.
///
/// Backend payloads carry money as JSON numbers or, in older shapes, as
/// numeric strings. Anything else (null, objects, NaN/Infinity, garbage
/// strings) yields `None` so callers can distinguish "absent or unusable"
/// from an explicit zero.
pub fn finite_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Like [`finite_decimal`] but coerces unusable input to zero. Used where a
/// malformed field must contribute nothing instead of failing the whole
/// computation.
pub fn decimal_or_zero(value: &Value) -> Decimal {
    finite_decimal(value).unwrap_or(Decimal::ZERO)
}
