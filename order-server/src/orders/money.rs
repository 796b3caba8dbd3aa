//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Rounding is 2 decimal places, half-up.

use rust_decimal::prelude::*;

use crate::utils::AppError;
use crate::utils::validation::MAX_LINE_QUANTITY;
use shared::models::OrderLine;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
const MAX_PRICE: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Round a decimal to 2 places, half-up
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an f64 amount into a Decimal, validating the range
fn to_decimal(value: f64, field_name: &str) -> Result<Decimal, AppError> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field_name, MAX_PRICE, value
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::validation(format!("{} is not representable", field_name)))
}

/// Compute a line subtotal: quantity × unit_price, rounded
pub fn line_subtotal(unit_price: f64, quantity: i32) -> Result<f64, AppError> {
    if quantity < 1 {
        return Err(AppError::validation(format!(
            "quantity must be at least 1, got {}",
            quantity
        )));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_LINE_QUANTITY, quantity
        )));
    }
    let price = to_decimal(unit_price, "unit_price")?;
    let subtotal = round2(price * Decimal::from(quantity));
    Ok(subtotal.to_f64().unwrap_or(0.0))
}

/// Compute order totals from resolved lines and the service fee
///
/// Returns `(subtotal, total)` where `total = subtotal + service_fee`.
pub fn order_totals(lines: &[OrderLine], service_fee: f64) -> Result<(f64, f64), AppError> {
    let fee = to_decimal(service_fee, "service_fee")?;
    let mut subtotal = Decimal::ZERO;
    for line in lines {
        subtotal += to_decimal(line.subtotal, "subtotal")?;
    }
    let subtotal = round2(subtotal);
    let total = round2(subtotal + fee);
    Ok((
        subtotal.to_f64().unwrap_or(0.0),
        total.to_f64().unwrap_or(0.0),
    ))
}
