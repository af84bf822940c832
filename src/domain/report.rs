//! The in-memory report document and its serialized form.
//!
//! A report is transient; only its JSON rendering is persisted as a
//! snapshot payload.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Map, Value};

use crate::domain::metrics::{smart_round, PerfMetrics};
use crate::domain::trade::split_pair;
use crate::error::Result;

/// Report time window, in whole epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub current: i64,
}

impl TimeWindow {
    #[must_use]
    pub fn duration_secs(&self) -> i64 {
        self.current - self.start
    }
}

/// Performance section for one (market, pair) partition.
#[derive(Debug, Clone)]
pub struct MarketSection {
    pub market: String,
    pub trading_pair: String,
    /// Margined venue: base-asset rows are placeholders since there is no
    /// direct base-asset holding.
    pub derivative: bool,
    pub metrics: PerfMetrics,
}

/// One aggregation cycle's output: a time window, per-partition sections,
/// and the unweighted mean of the per-partition returns (as a fraction).
#[derive(Debug, Clone)]
pub struct Report {
    pub window: TimeWindow,
    pub sections: Vec<MarketSection>,
    pub average_return: Decimal,
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn rounded(value: Decimal, precision: Option<u32>) -> f64 {
    to_f64(smart_round(value, precision))
}

/// Render a fraction as a percentage with two decimal places.
fn pct(value: Decimal) -> f64 {
    to_f64((value * dec!(100)).round_dp(2))
}

fn placeholder_row() -> Value {
    json!({ "start": "-", "current": "-", "change": "-" })
}

impl MarketSection {
    fn to_json(&self, precision: Option<u32>) -> Value {
        let (base, quote) = split_pair(&self.trading_pair);
        let m = &self.metrics;

        let mut trades = Map::new();
        trades.insert(
            "Number of trades".to_string(),
            json!({ "buy": m.buy_count, "sell": m.sell_count, "total": m.trade_count }),
        );
        trades.insert(
            format!("Total trade volume ({base})"),
            json!({
                "buy": rounded(m.buy_base_volume, precision),
                "sell": rounded(m.sell_base_volume, precision),
                "total": rounded(m.total_base_volume, precision),
            }),
        );
        trades.insert(
            format!("Total trade volume ({quote})"),
            json!({
                "buy": rounded(m.buy_quote_volume, precision),
                "sell": rounded(m.sell_quote_volume, precision),
                "total": rounded(m.total_quote_volume, precision),
            }),
        );
        trades.insert(
            "Avg price".to_string(),
            json!({
                "buy": rounded(m.avg_buy_price, precision),
                "sell": rounded(m.avg_sell_price, precision),
                "total": rounded(m.avg_price, precision),
            }),
        );

        let mut assets = Map::new();
        let base_row = if self.derivative {
            placeholder_row()
        } else {
            json!({
                "start": rounded(m.start_base_balance, precision),
                "current": rounded(m.current_base_balance, precision),
                "change": rounded(m.total_base_volume, precision),
            })
        };
        assets.insert(base.to_string(), base_row);
        assets.insert(
            quote.to_string(),
            json!({
                "start": rounded(m.start_quote_balance, precision),
                "current": rounded(m.current_quote_balance, precision),
                "change": rounded(m.total_quote_volume, precision),
            }),
        );
        assets.insert(
            format!("{} price", self.trading_pair),
            json!({
                "start": rounded(m.start_price, None),
                "current": rounded(m.current_price, None),
                "change": rounded(m.current_price - m.start_price, None),
            }),
        );
        let ratio_row = if self.derivative {
            placeholder_row()
        } else {
            json!({
                "start": pct(m.start_base_ratio_pct),
                "current": pct(m.current_base_ratio_pct),
                "change": pct(m.current_base_ratio_pct - m.start_base_ratio_pct),
            })
        };
        assets.insert("Base asset, %".to_string(), ratio_row);

        let mut performance = Map::new();
        performance.insert(
            format!("Hold portfolio value, {quote}"),
            json!(rounded(m.hold_value, precision)),
        );
        performance.insert(
            format!("Current portfolio value, {quote}"),
            json!(rounded(m.current_value, precision)),
        );
        performance.insert(
            format!("Trade P&L, {quote}"),
            json!(rounded(m.trade_pnl, precision)),
        );
        for (token, amount) in &m.fees {
            performance.insert(
                format!("Fees paid, {token}"),
                json!(rounded(*amount, precision)),
            );
        }
        performance.insert(
            format!("Total P&L, {quote}"),
            json!(rounded(m.total_pnl, precision)),
        );
        performance.insert("Return %".to_string(), json!(pct(m.return_pct)));

        json!({
            "Market": self.market,
            "Trading pair": self.trading_pair,
            "Trades": Value::Object(trades),
            "Assets": Value::Object(assets),
            "Performance": Value::Object(performance),
        })
    }
}

impl Report {
    /// Render the report document.
    #[must_use]
    pub fn to_json(&self, precision: Option<u32>) -> Value {
        json!({
            "Time": {
                "Start Time": self.window.start,
                "Current Time": self.window.current,
                "Duration, s": self.window.duration_secs(),
            },
            "Report": self.sections.iter().map(|s| s.to_json(precision)).collect::<Vec<_>>(),
            "Averaged Return, %": pct(self.average_return),
        })
    }

    /// Serialize the report to the snapshot payload form.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn to_payload(&self, precision: Option<u32>) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json(precision))?)
    }
}
