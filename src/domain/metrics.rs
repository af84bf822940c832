//! Performance metric shapes produced by the external performance engine.
//!
//! This subsystem never computes these figures; it only formats them into
//! report sections.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Per-(market, pair) performance metrics as returned by the engine.
///
/// Ratio fields (`*_ratio_pct`, `return_pct`) are fractions, not
/// percentages: a 5% return arrives as `0.05`.
#[derive(Debug, Clone, Default)]
pub struct PerfMetrics {
    pub buy_count: u64,
    pub sell_count: u64,
    pub trade_count: u64,

    pub buy_base_volume: Decimal,
    pub sell_base_volume: Decimal,
    pub total_base_volume: Decimal,
    pub buy_quote_volume: Decimal,
    pub sell_quote_volume: Decimal,
    pub total_quote_volume: Decimal,

    pub avg_buy_price: Decimal,
    pub avg_sell_price: Decimal,
    pub avg_price: Decimal,

    pub start_base_balance: Decimal,
    pub current_base_balance: Decimal,
    pub start_quote_balance: Decimal,
    pub current_quote_balance: Decimal,

    pub start_price: Decimal,
    pub current_price: Decimal,

    pub start_base_ratio_pct: Decimal,
    pub current_base_ratio_pct: Decimal,

    /// Value of the starting portfolio at current prices.
    pub hold_value: Decimal,
    /// Value of the current portfolio.
    pub current_value: Decimal,
    pub trade_pnl: Decimal,
    /// Fees paid, per fee token.
    pub fees: Vec<(String, Decimal)>,
    pub total_pnl: Decimal,
    pub return_pct: Decimal,
}

/// Round a figure for display.
///
/// With an explicit precision, round to that many decimal places.
/// Without one, pick the precision from the figure's magnitude so large
/// volumes stay whole-ish while dust amounts keep their leading digits.
#[must_use]
pub fn smart_round(value: Decimal, precision: Option<u32>) -> Decimal {
    if let Some(places) = precision {
        return value.round_dp(places);
    }
    let abs = value.abs();
    let places = if abs >= dec!(10000) {
        0
    } else if abs >= dec!(100) {
        1
    } else if abs >= dec!(1) {
        2
    } else if abs >= dec!(0.01) {
        4
    } else if abs >= dec!(0.0001) {
        5
    } else {
        8
    };
    value.round_dp(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_precision_rounds_to_decimal_places() {
        assert_eq!(smart_round(dec!(1.23456), Some(2)), dec!(1.23));
        assert_eq!(smart_round(dec!(1.23556), Some(2)), dec!(1.24));
        assert_eq!(smart_round(dec!(1234.5678), Some(0)), dec!(1235));
    }

    #[test]
    fn magnitude_rounding_keeps_fewer_places_for_large_values() {
        assert_eq!(smart_round(dec!(12345.678), None), dec!(12346));
        assert_eq!(smart_round(dec!(123.456), None), dec!(123.5));
        assert_eq!(smart_round(dec!(1.23456), None), dec!(1.23));
    }

    #[test]
    fn magnitude_rounding_keeps_more_places_for_dust() {
        assert_eq!(smart_round(dec!(0.012345), None), dec!(0.0123));
        assert_eq!(smart_round(dec!(0.00012345), None), dec!(0.00012));
        assert_eq!(smart_round(dec!(0.0000123456789), None), dec!(0.00001235));
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(smart_round(Decimal::ZERO, None), Decimal::ZERO);
        assert_eq!(smart_round(Decimal::ZERO, Some(3)), Decimal::ZERO);
    }

    #[test]
    fn negative_values_round_symmetrically() {
        assert_eq!(smart_round(dec!(-123.456), None), dec!(-123.5));
        assert_eq!(smart_round(dec!(-1.23456), Some(3)), dec!(-1.235));
    }
}
