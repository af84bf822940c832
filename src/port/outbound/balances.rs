//! Balance lookup port and the per-market source registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;

/// Asset symbol to quantity.
pub type Balances = HashMap<String, Decimal>;

/// One market's way of producing current balances.
///
/// The variant for a market is chosen once, when the market is registered:
/// live connectors, paper-trading maps and generic gateways have stock
/// adapters; specialized integrations implement this trait directly.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn balances(&self) -> Result<Balances>;
}

/// Balance sources keyed by market name, built at registration time.
#[derive(Default)]
pub struct BalanceRegistry {
    sources: HashMap<String, Arc<dyn BalanceSource>>,
}

impl BalanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a market to its balance source. A later registration for the
    /// same market replaces the earlier one.
    pub fn register(&mut self, market: impl Into<String>, source: Arc<dyn BalanceSource>) {
        self.sources.insert(market.into(), source);
    }

    #[must_use]
    pub fn get(&self, market: &str) -> Option<Arc<dyn BalanceSource>> {
        self.sources.get(market).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
