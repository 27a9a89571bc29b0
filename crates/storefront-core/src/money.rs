//! Minor-Unit Conversion
//!
//! Payment providers want integer subunits (grosze, cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CartError, Result};

/// Minor units per major unit for every currency the shop sells in
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Convert a major-unit amount to integer minor units, rounding half up.
///
/// Exact for any amount with at most two decimal places.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or(CartError::AmountOutOfRange(amount))
}

/// Convert integer minor units back to a major-unit amount
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_two_decimal_conversion() {
        assert_eq!(to_minor_units(dec!(150.25)).unwrap(), 15025);
        assert_eq!(to_minor_units(dec!(100.00)).unwrap(), 10000);
        assert_eq!(to_minor_units(dec!(0.01)).unwrap(), 1);
        assert_eq!(to_minor_units(dec!(19.99)).unwrap(), 1999);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(to_minor_units(dec!(10.005)).unwrap(), 1001);
        assert_eq!(to_minor_units(dec!(10.0049)).unwrap(), 1000);
        assert_eq!(to_minor_units(dec!(0.125)).unwrap(), 13);
    }

    #[test]
    fn test_out_of_range() {
        assert!(to_minor_units(Decimal::MAX).is_err());
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(15025), dec!(150.25));
        assert_eq!(from_minor_units(1999), dec!(19.99));
    }
}
