//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no collaborator access.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use super::models::{Adjustment, AdjustmentKind, Season};

/// Round to specified decimal places, halves away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use boarding_engine::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(66.665), 2), dec!(66.67));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Signed amount an adjustment contributes, unrounded.
///
/// `None` when the amount falls outside the representable range.
pub fn adjustment_amount(base_price: Decimal, adjustment: &Adjustment) -> Option<Decimal> {
    match adjustment.kind {
        AdjustmentKind::Percentage => {
            base_price.checked_mul(adjustment.value.checked_div(dec!(100))?)
        }
        AdjustmentKind::FixedAmount => Some(adjustment.value),
    }
}

/// `max(0, round2(base + total_adjustment))`, the only rounding step of a quote.
///
/// `None` when the sum overflows.
pub fn final_price(base_price: Decimal, total_adjustment: Decimal) -> Option<Decimal> {
    let price = base_price.checked_add(total_adjustment)?;
    Some(round_money(price, 2).max(Decimal::ZERO))
}

/// Season of a date by fixed month boundaries.
///
/// Spring Mar-May, Summer Jun-Aug, Fall Sep-Nov, Winter Dec-Feb.
pub fn season_of(date: NaiveDate) -> Season {
    match date.month() {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Fall,
        _ => Season::Winter,
    }
}

/// Human-readable form of an adjustment, e.g. `+20%` or `-15.00`.
pub fn describe_adjustment(adjustment: &Adjustment) -> String {
    let sign = if adjustment.value.is_sign_negative() { "-" } else { "+" };
    let magnitude = adjustment.value.abs();
    match adjustment.kind {
        AdjustmentKind::Percentage => format!("{}{}%", sign, magnitude.normalize()),
        AdjustmentKind::FixedAmount => format!("{}{:.2}", sign, magnitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(value: Decimal) -> Adjustment {
        Adjustment {
            kind: AdjustmentKind::Percentage,
            value,
        }
    }

    fn fixed(value: Decimal) -> Adjustment {
        Adjustment {
            kind: AdjustmentKind::FixedAmount,
            value,
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(3));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.3));
        assert_eq!(round_money(dec!(2.45), 1), dec!(2.5));
        assert_eq!(round_money(dec!(0.005), 2), dec!(0.01));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(123456.789), 2), dec!(123456.79));
        assert_eq!(round_money(dec!(999999.995), 2), dec!(1000000.00));
    }

    #[test]
    fn test_round_money_negative() {
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
        assert_eq!(round_money(dec!(-1.234), 2), dec!(-1.23));
    }

    // ==================== adjustment tests ====================

    #[test]
    fn test_percentage_adjustment_is_not_rounded() {
        assert_eq!(adjustment_amount(dec!(100), &pct(dec!(20))), Some(dec!(20)));
        assert_eq!(
            adjustment_amount(dec!(100), &pct(dec!(-33.33))),
            Some(dec!(-33.33))
        );
        assert_eq!(
            adjustment_amount(dec!(10.01), &pct(dec!(15))),
            Some(dec!(1.5015))
        );
    }

    #[test]
    fn test_fixed_adjustment_ignores_base() {
        assert_eq!(
            adjustment_amount(dec!(100), &fixed(dec!(-12.50))),
            Some(dec!(-12.50))
        );
        assert_eq!(adjustment_amount(dec!(0), &fixed(dec!(5))), Some(dec!(5)));
    }

    #[test]
    fn test_overflow_is_reported_not_panicked() {
        assert_eq!(adjustment_amount(Decimal::MAX, &pct(dec!(200))), None);
        assert_eq!(final_price(Decimal::MAX, Decimal::MAX), None);
        assert_eq!(final_price(Decimal::MAX, dec!(-1)), Some(Decimal::MAX - dec!(1)));
    }

    #[test]
    fn test_final_price_rounds_once_and_floors_at_zero() {
        assert_eq!(final_price(dec!(100), dec!(-33.33)), Some(dec!(66.67)));
        assert_eq!(final_price(dec!(10.01), dec!(1.5015)), Some(dec!(11.51)));
        assert_eq!(final_price(dec!(100), dec!(-150)), Some(Decimal::ZERO));
        assert!(!final_price(dec!(100), dec!(-150)).unwrap().is_sign_negative());
        assert_eq!(final_price(dec!(0), dec!(0)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_rounding_once_differs_from_per_rule_rounding() {
        // Three +0.333% adjustments on 1.00: per-rule rounding would give 1.00
        let base = dec!(1.00);
        let each = adjustment_amount(base, &pct(dec!(0.333))).unwrap();
        let total = each + each + each;
        assert_eq!(final_price(base, total), Some(dec!(1.01)));
    }

    // ==================== season tests ====================

    #[test]
    fn test_season_boundaries() {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        assert_eq!(season_of(d(2, 29)), Season::Winter);
        assert_eq!(season_of(d(3, 1)), Season::Spring);
        assert_eq!(season_of(d(5, 31)), Season::Spring);
        assert_eq!(season_of(d(6, 1)), Season::Summer);
        assert_eq!(season_of(d(8, 31)), Season::Summer);
        assert_eq!(season_of(d(9, 1)), Season::Fall);
        assert_eq!(season_of(d(11, 30)), Season::Fall);
        assert_eq!(season_of(d(12, 1)), Season::Winter);
        assert_eq!(season_of(d(1, 15)), Season::Winter);
    }

    #[test]
    fn test_describe_adjustment() {
        assert_eq!(describe_adjustment(&pct(dec!(20.00))), "+20%");
        assert_eq!(describe_adjustment(&pct(dec!(-33.33))), "-33.33%");
        assert_eq!(describe_adjustment(&fixed(dec!(-15))), "-15.00");
        assert_eq!(describe_adjustment(&fixed(dec!(7.5))), "+7.50");
    }
}
