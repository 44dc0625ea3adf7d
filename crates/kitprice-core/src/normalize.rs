//! Raw field input to domain values.
//!
//! Every function here is total: input that fails to parse, or parses to a
//! value outside the field's range, becomes that field's default. Nothing is
//! reported back to the caller.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{Amount, MAX_QUANTITY, Quantity};

/// Parses a quantity, falling back to [`Quantity::ONE`].
///
/// Fractional quantities are out of range.
pub fn normalize_quantity(raw: &str) -> Quantity {
    parse_number(raw)
        .filter(|value| value.fract().is_zero())
        .filter(|value| *value >= Decimal::ONE && *value <= Decimal::from(MAX_QUANTITY))
        .and_then(|value| value.to_u32())
        .and_then(Quantity::new)
        .unwrap_or(Quantity::ONE)
}

/// Parses a unit list price or kit price, falling back to [`Amount::ZERO`].
///
/// Negative values clamp to zero.
pub fn normalize_amount(raw: &str) -> Amount {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let digits = unsigned.replace(',', "");

    parse_number(&digits)
        .map(|value| value.max(Decimal::ZERO))
        .and_then(Amount::new)
        .unwrap_or(Amount::ZERO)
}

pub fn normalize_refunded(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "checked"
    )
}

fn parse_number(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    // the decimal parser skips `_` digit separators; typed input never has them
    if trimmed.is_empty() || trimmed.contains('_') {
        return None;
    }

    Decimal::from_str(trimmed)
        .ok()
        .or_else(|| Decimal::from_scientific(trimmed).ok())
}
