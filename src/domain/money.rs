//! Monetary types for yen amounts and ratios.

use rust_decimal::{Decimal, RoundingStrategy};

/// Yen amount represented as a Decimal for precision.
pub type Yen = Decimal;

/// Round to whole yen (half to even).
#[must_use]
pub fn whole_yen(value: Yen) -> Yen {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Round a ratio such as ROI to two decimal places (half to even).
#[must_use]
pub fn ratio(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Drop the fractional yen, as point and referral calculations do.
#[must_use]
pub fn floor_yen(value: Yen) -> Yen {
    value.floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_yen_rounds_half_to_even() {
        assert_eq!(whole_yen(dec!(512.5)), dec!(512));
        assert_eq!(whole_yen(dec!(513.5)), dec!(514));
        assert_eq!(whole_yen(dec!(-12.4)), dec!(-12));
    }

    #[test]
    fn ratio_keeps_two_places() {
        assert_eq!(ratio(dec!(0.31666)), dec!(0.32));
        assert_eq!(ratio(dec!(0.125)), dec!(0.12));
    }

    #[test]
    fn floor_yen_truncates_towards_negative_infinity() {
        assert_eq!(floor_yen(dec!(99.9)), dec!(99));
        assert_eq!(floor_yen(dec!(-0.5)), dec!(-1));
    }
}
