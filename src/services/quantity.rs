use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Fixed scale for all quantity comparisons.
pub const QUANTITY_SCALE: u32 = 4;

fn truncated(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::ToZero)
}

/// Compare two quantities with both operands truncated to 4 fractional
/// digits. Exact decimal arithmetic throughout, so representation error
/// can never produce a false inequality.
pub fn compare(a: Decimal, b: Decimal) -> Ordering {
    truncated(a).cmp(&truncated(b))
}

/// True when `available` covers `required` at 4-digit precision.
pub fn is_sufficient(available: Decimal, required: Decimal) -> bool {
    compare(available, required) != Ordering::Less
}
