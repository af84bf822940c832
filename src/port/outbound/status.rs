//! Ports consulted when producing a status snapshot.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// Formats the running strategy's current status for display.
#[async_trait]
pub trait StrategyStatus: Send + Sync {
    async fn format_status(&self) -> Result<String>;
}

/// Security subsystem gate: config decryption must finish before status
/// checks can pass.
pub trait SecurityGate: Send + Sync {
    fn is_decryption_done(&self) -> bool;
}

/// Connection and configuration validation supplied by the host.
#[async_trait]
pub trait ConnectionCheck: Send + Sync {
    /// Required connections that failed validation, name to error message.
    async fn invalid_connections(&self) -> HashMap<String, String>;

    /// Strategy configuration keys that are still unset.
    fn missing_settings(&self) -> Vec<String>;
}
