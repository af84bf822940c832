//! Preliminary status checks.
//!
//! Run when no strategy is active: each failed precondition contributes a
//! human-readable diagnostic line, and the single `passed` flag gates
//! whether the cycle proceeds.

use std::sync::Arc;

use crate::port::outbound::connector::Connector;
use crate::port::outbound::status::{ConnectionCheck, SecurityGate};

/// The diagnostic lines plus the overall verdict of one check run.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub lines: Vec<String>,
    pub passed: bool,
}

impl CheckOutcome {
    fn failed(lines: Vec<String>) -> Self {
        Self {
            lines,
            passed: false,
        }
    }
}

pub struct StatusChecks {
    /// (name, config file path) of the imported strategy, if any.
    strategy: Option<(String, String)>,
    security: Arc<dyn SecurityGate>,
    connections: Arc<dyn ConnectionCheck>,
    markets: Vec<Arc<dyn Connector>>,
}

impl StatusChecks {
    #[must_use]
    pub fn new(
        strategy: Option<(String, String)>,
        security: Arc<dyn SecurityGate>,
        connections: Arc<dyn ConnectionCheck>,
        markets: Vec<Arc<dyn Connector>>,
    ) -> Self {
        Self {
            strategy,
            security,
            connections,
            markets,
        }
    }

    /// Run every check, collecting diagnostic lines as the original status
    /// command words them. Early checks short-circuit: nothing later runs
    /// once the strategy or security preconditions fail.
    pub async fn run(&self) -> CheckOutcome {
        let mut lines = vec!["\nPreliminary checks:".to_string()];

        if self.strategy.is_none() {
            lines.push("  - Strategy check: Please import or create a strategy.".to_string());
            return CheckOutcome::failed(lines);
        }

        if !self.security.is_decryption_done() {
            lines.push(
                "  - Security check: Encrypted files are being processed. \
                 Please wait and try again later."
                    .to_string(),
            );
            return CheckOutcome::failed(lines);
        }

        let invalid = self.connections.invalid_connections().await;
        if invalid.is_empty() {
            lines.push("  - Exchange check: All connections confirmed.".to_string());
        } else {
            lines.push("  - Exchange check: Invalid connections:".to_string());
            let mut names: Vec<_> = invalid.iter().collect();
            names.sort();
            for (exchange, err) in names {
                lines.push(format!("    {exchange}: {err}"));
            }
        }

        let missing = self.connections.missing_settings();
        if missing.is_empty() {
            lines.push("  - Strategy check: All required parameters confirmed.".to_string());
        } else {
            lines.push(
                "  - Strategy check: Incomplete strategy configuration. \
                 The following values are missing."
                    .to_string(),
            );
            for key in &missing {
                lines.push(format!("    {key}"));
            }
        }

        if !invalid.is_empty() || !missing.is_empty() {
            return CheckOutcome::failed(lines);
        }

        let loading: Vec<&str> = self
            .markets
            .iter()
            .filter(|m| !m.is_ready())
            .map(|m| m.name())
            .collect();
        if !loading.is_empty() {
            lines.push(format!(
                "  - Connectors check: Waiting for connectors {} to get ready for trading. \
                 Please keep the process running and try again in a few minutes.",
                loading.join(",")
            ));
            return CheckOutcome::failed(lines);
        }

        let offline: Vec<&str> = self
            .markets
            .iter()
            .filter(|m| !m.is_connected())
            .map(|m| m.name())
            .collect();
        if !offline.is_empty() {
            for market in offline {
                lines.push(format!(
                    "  - Connector check: {market} is currently offline."
                ));
            }
            return CheckOutcome::failed(lines);
        }

        lines.push("  - All checks: Confirmed.".to_string());
        CheckOutcome {
            lines,
            passed: true,
        }
    }
}
