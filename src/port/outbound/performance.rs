//! Performance engine port.

use async_trait::async_trait;

use crate::domain::metrics::PerfMetrics;
use crate::domain::trade::TradeFill;
use crate::error::Result;
use crate::port::outbound::balances::Balances;

/// External engine that turns one partition's fills and balances into
/// performance metrics. The formulas live with the engine; this subsystem
/// only formats the result.
#[async_trait]
pub trait PerformanceEngine: Send + Sync {
    async fn evaluate(
        &self,
        market: &str,
        trading_pair: &str,
        fills: &[TradeFill],
        balances: &Balances,
    ) -> Result<PerfMetrics>;
}
