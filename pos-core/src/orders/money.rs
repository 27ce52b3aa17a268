//! Money Arithmetic
//!
//! All currency math runs through `Decimal` and is rounded half-away-from-
//! zero to 2 places at each boundary, so stored totals are exact cent values
//! and the checkout comparison never trips on binary float noise.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::{OrderLine, PosError, PosResult};

/// Flat tax applied to the subtotal
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2); // 0.10

const DECIMAL_PLACES: u32 = 2;

/// Upper bound on a single unit price; anything above is operator error
pub const MAX_PRICE: f64 = 100_000.0;

/// Upper bound on a single line quantity
pub const MAX_QUANTITY: i32 = 999;

/// Round to cents, half away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a stored f64 amount to Decimal, rejecting NaN/infinity
pub fn to_decimal(value: f64, what: &str) -> PosResult<Decimal> {
    require_finite(value, what)?;
    Decimal::from_f64(value)
        .ok_or_else(|| PosError::validation(format!("{} is not a representable amount", what)))
}

/// Convert back to the stored f64 representation, rounded to cents
pub fn to_f64(value: Decimal) -> f64 {
    round2(value).to_f64().unwrap_or(0.0)
}

pub fn require_finite(value: f64, what: &str) -> PosResult<()> {
    if !value.is_finite() {
        return Err(PosError::validation(format!(
            "{} must be a finite number",
            what
        )));
    }
    Ok(())
}

/// Validate a line at the cart boundary
pub fn validate_line(line: &OrderLine) -> PosResult<()> {
    require_finite(line.unit_price, "unit price")?;
    if line.unit_price < 0.0 {
        return Err(PosError::validation(format!(
            "unit price must not be negative, got {}",
            line.unit_price
        )));
    }
    if line.unit_price > MAX_PRICE {
        return Err(PosError::validation(format!(
            "unit price {} exceeds the maximum of {}",
            line.unit_price, MAX_PRICE
        )));
    }
    if line.quantity < 1 {
        return Err(PosError::validation(format!(
            "quantity must be at least 1, got {}",
            line.quantity
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(PosError::validation(format!(
            "quantity {} exceeds the maximum of {}",
            line.quantity, MAX_QUANTITY
        )));
    }
    if line.item_id.is_empty() {
        return Err(PosError::validation("line is missing an item id"));
    }
    Ok(())
}

/// Line total: unit price x quantity, rounded to cents
pub fn line_total(line: &OrderLine) -> PosResult<Decimal> {
    let price = to_decimal(line.unit_price, "unit price")?;
    Ok(round2(price * Decimal::from(line.quantity)))
}

/// Sum of line totals
pub fn subtotal(lines: &[OrderLine]) -> PosResult<Decimal> {
    let mut sum = Decimal::ZERO;
    for line in lines {
        sum += line_total(line)?;
    }
    Ok(round2(sum))
}

/// Tax on a subtotal
pub fn calc_tax(subtotal: Decimal) -> Decimal {
    round2(subtotal * TAX_RATE)
}

/// Grand total: subtotal + tax
pub fn calc_total(subtotal: Decimal) -> Decimal {
    round2(subtotal + calc_tax(subtotal))
}

/// Change due on a payment; caller has already verified paid >= total
pub fn calc_change(paid: Decimal, total: Decimal) -> Decimal {
    round2(paid - total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: f64, quantity: i32) -> OrderLine {
        OrderLine {
            item_id: "item:test".to_string(),
            name: "Test".to_string(),
            unit_price: price,
            quantity,
        }
    }

    #[test]
    fn totals_for_the_reference_cart() {
        // 2 x 12.99 + 1 x 4.99
        let lines = vec![line(12.99, 2), line(4.99, 1)];
        let sub = subtotal(&lines).unwrap();
        assert_eq!(to_f64(sub), 30.97);
        assert_eq!(to_f64(calc_tax(sub)), 3.10);
        assert_eq!(to_f64(calc_total(sub)), 34.07);
    }

    #[test]
    fn change_is_exact_cents() {
        let sub = subtotal(&[line(12.99, 2), line(4.99, 1)]).unwrap();
        let total = calc_total(sub);
        let paid = to_decimal(40.0, "paid").unwrap();
        assert_eq!(to_f64(calc_change(paid, total)), 5.93);
    }

    #[test]
    fn change_for_a_round_tender() {
        let paid = to_decimal(50.00, "paid").unwrap();
        let total = to_decimal(45.10, "total").unwrap();
        assert_eq!(to_f64(calc_change(paid, total)), 4.90);
    }

    #[test]
    fn tax_rounds_half_away_from_zero() {
        // 0.25 * 0.10 = 0.025 → 0.03
        let sub = to_decimal(0.25, "subtotal").unwrap();
        assert_eq!(to_f64(calc_tax(sub)), 0.03);
    }

    #[test]
    fn rejects_non_finite_and_out_of_range() {
        assert!(validate_line(&line(f64::NAN, 1)).is_err());
        assert!(validate_line(&line(f64::INFINITY, 1)).is_err());
        assert!(validate_line(&line(-1.0, 1)).is_err());
        assert!(validate_line(&line(MAX_PRICE + 1.0, 1)).is_err());
        assert!(validate_line(&line(9.99, 0)).is_err());
        assert!(validate_line(&line(9.99, MAX_QUANTITY + 1)).is_err());
        assert!(validate_line(&line(9.99, 3)).is_ok());
    }

    #[test]
    fn empty_cart_subtotal_is_zero() {
        assert_eq!(subtotal(&[]).unwrap(), Decimal::ZERO);
    }
}
