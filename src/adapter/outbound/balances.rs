//! Stock balance sources for the closed set of market kinds.
//!
//! Live connectors, paper-trading venues and generic gateways are covered
//! here; market-specific integrations implement
//! [`BalanceSource`](crate::port::outbound::balances::BalanceSource)
//! themselves and register alongside these.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::port::outbound::balances::{BalanceSource, Balances};
use crate::port::outbound::connector::Connector;

/// Balances read straight from a live connector.
///
/// Refuses to answer while the connector is still starting up or offline,
/// so a report never mixes in stale numbers.
pub struct LiveConnectorBalances {
    connector: Arc<dyn Connector>,
}

impl LiveConnectorBalances {
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl BalanceSource for LiveConnectorBalances {
    async fn balances(&self) -> Result<Balances> {
        if !self.connector.is_ready() {
            return Err(Error::Balance {
                venue: self.connector.name().to_string(),
                reason: "connector not ready".to_string(),
            });
        }
        if !self.connector.is_connected() {
            return Err(Error::Balance {
                venue: self.connector.name().to_string(),
                reason: "connector offline".to_string(),
            });
        }
        self.connector.all_balances().await
    }
}

/// Simulated balances for a paper-trading venue, fixed at registration.
pub struct PaperBalances {
    balances: Balances,
}

impl PaperBalances {
    #[must_use]
    pub fn new(balances: Balances) -> Self {
        Self { balances }
    }
}

#[async_trait]
impl BalanceSource for PaperBalances {
    async fn balances(&self) -> Result<Balances> {
        Ok(self.balances.clone())
    }
}

/// Generic gateway path: force a refresh, then read.
pub struct GatewayBalances {
    connector: Arc<dyn Connector>,
}

impl GatewayBalances {
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl BalanceSource for GatewayBalances {
    async fn balances(&self) -> Result<Balances> {
        self.connector.refresh_balances().await?;
        self.connector.all_balances().await
    }
}
