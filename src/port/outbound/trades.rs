//! Trade fill retrieval port.

use async_trait::async_trait;

use crate::domain::trade::TradeFill;
use crate::error::Result;

/// Access to the host application's fill storage.
///
/// The reporting subsystem never owns fill persistence; it only reads the
/// window it is asked to report on.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// All fills recorded for `config_path` at or after `since_ms`
    /// (epoch milliseconds), oldest first.
    async fn fills_since(&self, config_path: &str, since_ms: i64) -> Result<Vec<TradeFill>>;
}
