//! Exchange connector port.
//!
//! The reporting subsystem only needs readiness signals and balance reads;
//! order routing and market data stay with the host application.

use async_trait::async_trait;

use crate::error::Result;
use crate::port::outbound::balances::Balances;

/// Narrow view of an exchange connector.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connector (market) name, e.g. "binance".
    fn name(&self) -> &str;

    /// Whether the connector has finished its startup checks.
    fn is_ready(&self) -> bool;

    /// Whether the connector's network session is currently up.
    fn is_connected(&self) -> bool;

    /// Force a balance refresh against the exchange.
    async fn refresh_balances(&self) -> Result<()>;

    /// Last known balances, keyed by asset symbol.
    async fn all_balances(&self) -> Result<Balances>;
}
