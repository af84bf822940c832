//! Report aggregation: trades in, report document out.
//!
//! Partitions the window's fills by (market, pair), fetches balances from
//! each market's registered source, hands both to the performance engine,
//! and assembles the sections. A partition whose balance fetch or metric
//! computation fails is logged and skipped for this cycle; the remaining
//! partitions still report.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::report::{MarketSection, Report, TimeWindow};
use crate::domain::trade::TradeFill;
use crate::port::outbound::balances::BalanceRegistry;
use crate::port::outbound::performance::PerformanceEngine;

pub struct ReportAggregator {
    balances: BalanceRegistry,
    engine: Arc<dyn PerformanceEngine>,
    /// Markets whose base-asset rows are placeholders (margined venues).
    derivatives: HashSet<String>,
}

impl ReportAggregator {
    #[must_use]
    pub fn new(
        balances: BalanceRegistry,
        engine: Arc<dyn PerformanceEngine>,
        derivatives: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            balances,
            engine,
            derivatives: derivatives.into_iter().collect(),
        }
    }

    /// Build a report for the fills since `start_secs` (epoch seconds).
    ///
    /// Returns `None` for an empty fill list: no report is produced and
    /// nothing should be persisted for this cycle.
    pub async fn aggregate(&self, start_secs: i64, fills: &[TradeFill]) -> Option<Report> {
        if fills.is_empty() {
            debug!("No fills in window, skipping aggregation");
            return None;
        }

        // Partitions in first-seen order, so section order is stable
        // across identical inputs.
        let mut partitions: Vec<(String, String)> = Vec::new();
        for fill in fills {
            let key = (fill.market.clone(), fill.trading_pair.clone());
            if !partitions.contains(&key) {
                partitions.push(key);
            }
        }

        let mut sections = Vec::with_capacity(partitions.len());
        let mut returns: Vec<Decimal> = Vec::with_capacity(partitions.len());

        for (market, trading_pair) in partitions {
            let partition_fills: Vec<TradeFill> = fills
                .iter()
                .filter(|f| f.market == market && f.trading_pair == trading_pair)
                .cloned()
                .collect();

            let Some(source) = self.balances.get(&market) else {
                warn!(market = %market, "No balance source registered, skipping partition");
                continue;
            };
            let balances = match source.balances().await {
                Ok(balances) => balances,
                Err(e) => {
                    warn!(market = %market, error = %e, "Balance fetch failed, skipping partition");
                    continue;
                }
            };

            let metrics = match self
                .engine
                .evaluate(&market, &trading_pair, &partition_fills, &balances)
                .await
            {
                Ok(metrics) => metrics,
                Err(e) => {
                    warn!(
                        market = %market,
                        trading_pair = %trading_pair,
                        error = %e,
                        "Performance computation failed, skipping partition"
                    );
                    continue;
                }
            };

            returns.push(metrics.return_pct);
            sections.push(MarketSection {
                derivative: self.derivatives.contains(&market),
                market,
                trading_pair,
                metrics,
            });
        }

        let average_return = if returns.is_empty() {
            Decimal::ZERO
        } else {
            returns.iter().sum::<Decimal>() / Decimal::from(returns.len() as u64)
        };

        Some(Report {
            window: TimeWindow {
                start: start_secs,
                current: Utc::now().timestamp(),
            },
            sections,
            average_return,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::PerfMetrics;
    use crate::domain::trade::TradeSide;
    use crate::error::{Error, Result};
    use crate::port::outbound::balances::{BalanceSource, Balances};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct FixedBalances(Balances);

    #[async_trait]
    impl BalanceSource for FixedBalances {
        async fn balances(&self) -> Result<Balances> {
            Ok(self.0.clone())
        }
    }

    struct FailingBalances;

    #[async_trait]
    impl BalanceSource for FailingBalances {
        async fn balances(&self) -> Result<Balances> {
            Err(Error::Balance {
                venue: "down".to_string(),
                reason: "timeout".to_string(),
            })
        }
    }

    /// Engine returning a canned per-pair return percentage.
    struct CannedEngine;

    #[async_trait]
    impl PerformanceEngine for CannedEngine {
        async fn evaluate(
            &self,
            _market: &str,
            trading_pair: &str,
            fills: &[TradeFill],
            _balances: &Balances,
        ) -> Result<PerfMetrics> {
            let return_pct = match trading_pair {
                "BTC-USDT" => dec!(0.04),
                "ETH-USDT" => dec!(0.06),
                _ => dec!(0.01),
            };
            Ok(PerfMetrics {
                trade_count: fills.len() as u64,
                return_pct,
                ..Default::default()
            })
        }
    }

    fn fill(market: &str, pair: &str) -> TradeFill {
        TradeFill {
            market: market.to_string(),
            trading_pair: pair.to_string(),
            side: TradeSide::Buy,
            price: dec!(100),
            amount: dec!(1),
            timestamp_ms: 1_700_000_000_000,
        }
    }

    fn registry_for(markets: &[&str]) -> BalanceRegistry {
        let mut registry = BalanceRegistry::new();
        for market in markets {
            registry.register(
                market.to_string(),
                std::sync::Arc::new(FixedBalances(Balances::new())),
            );
        }
        registry
    }

    #[tokio::test]
    async fn empty_fills_produce_no_report() {
        let aggregator =
            ReportAggregator::new(registry_for(&["binance"]), Arc::new(CannedEngine), []);

        assert!(aggregator.aggregate(0, &[]).await.is_none());
    }

    #[tokio::test]
    async fn two_partitions_average_their_returns() {
        let aggregator =
            ReportAggregator::new(registry_for(&["binance"]), Arc::new(CannedEngine), []);
        let fills = vec![
            fill("binance", "BTC-USDT"),
            fill("binance", "ETH-USDT"),
            fill("binance", "BTC-USDT"),
        ];

        let report = aggregator.aggregate(1_700_000_000, &fills).await.unwrap();

        assert_eq!(report.sections.len(), 2);
        // 4% and 6% average to exactly 5%.
        assert_eq!(report.average_return, dec!(0.05));
        let doc = report.to_json(None);
        assert_eq!(doc["Averaged Return, %"], 5.0);
    }

    #[tokio::test]
    async fn single_partition_average_equals_its_own_return() {
        let aggregator =
            ReportAggregator::new(registry_for(&["binance"]), Arc::new(CannedEngine), []);
        let fills = vec![fill("binance", "BTC-USDT"), fill("binance", "BTC-USDT")];

        let report = aggregator.aggregate(1_700_000_000, &fills).await.unwrap();

        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.average_return, dec!(0.04));
        assert_eq!(report.sections[0].metrics.trade_count, 2);
    }

    #[tokio::test]
    async fn partition_fills_are_split_per_market_and_pair() {
        let aggregator = ReportAggregator::new(
            registry_for(&["binance", "kraken"]),
            Arc::new(CannedEngine),
            [],
        );
        let fills = vec![
            fill("binance", "BTC-USDT"),
            fill("kraken", "BTC-USDT"),
            fill("binance", "BTC-USDT"),
        ];

        let report = aggregator.aggregate(1_700_000_000, &fills).await.unwrap();

        assert_eq!(report.sections.len(), 2);
        let binance = report
            .sections
            .iter()
            .find(|s| s.market == "binance")
            .unwrap();
        assert_eq!(binance.metrics.trade_count, 2);
    }

    #[tokio::test]
    async fn failing_balance_source_skips_only_its_partition() {
        let mut registry = registry_for(&["binance"]);
        registry.register("down_exchange", Arc::new(FailingBalances));
        let aggregator = ReportAggregator::new(registry, Arc::new(CannedEngine), []);
        let fills = vec![
            fill("binance", "BTC-USDT"),
            fill("down_exchange", "ETH-USDT"),
        ];

        let report = aggregator.aggregate(1_700_000_000, &fills).await.unwrap();

        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].market, "binance");
        assert_eq!(report.average_return, dec!(0.04));
    }

    #[tokio::test]
    async fn unregistered_market_is_skipped() {
        let aggregator =
            ReportAggregator::new(registry_for(&["binance"]), Arc::new(CannedEngine), []);
        let fills = vec![fill("binance", "BTC-USDT"), fill("unknown", "ETH-USDT")];

        let report = aggregator.aggregate(1_700_000_000, &fills).await.unwrap();

        assert_eq!(report.sections.len(), 1);
    }

    #[tokio::test]
    async fn derivative_markets_are_flagged() {
        let aggregator = ReportAggregator::new(
            registry_for(&["binance_perpetual"]),
            Arc::new(CannedEngine),
            ["binance_perpetual".to_string()],
        );
        let fills = vec![fill("binance_perpetual", "BTC-USDT")];

        let report = aggregator.aggregate(1_700_000_000, &fills).await.unwrap();

        assert!(report.sections[0].derivative);
    }

    #[tokio::test]
    async fn window_start_is_carried_into_the_report() {
        let aggregator =
            ReportAggregator::new(registry_for(&["binance"]), Arc::new(CannedEngine), []);
        let fills = vec![fill("binance", "BTC-USDT")];

        let report = aggregator.aggregate(1_699_999_000, &fills).await.unwrap();

        assert_eq!(report.window.start, 1_699_999_000);
        assert!(report.window.current >= report.window.start);
    }
}
