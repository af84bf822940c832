//! Trade fill shapes consumed from the host application's fill storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a filled order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A single trade fill, the minimum shape needed to partition history
/// and feed the performance engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeFill {
    /// Market (connector) name, e.g. "binance".
    pub market: String,
    /// Trading pair in BASE-QUOTE form, e.g. "BTC-USDT".
    pub trading_pair: String,
    pub side: TradeSide,
    pub price: Decimal,
    pub amount: Decimal,
    /// Fill time in epoch milliseconds.
    pub timestamp_ms: i64,
}

impl TradeFill {
    /// The (market, pair) grouping key used to compute performance
    /// independently per traded instrument.
    #[must_use]
    pub fn partition_key(&self) -> (&str, &str) {
        (&self.market, &self.trading_pair)
    }
}

/// Split a BASE-QUOTE pair into its two assets.
///
/// Pairs without a separator come back as (pair, "") so formatting can
/// still proceed.
#[must_use]
pub fn split_pair(trading_pair: &str) -> (&str, &str) {
    match trading_pair.split_once('-') {
        Some((base, quote)) => (base, quote),
        None => (trading_pair, ""),
    }
}
