//! Snapshot persistence port.

use async_trait::async_trait;

use crate::error::Result;

/// The latest report for one strategy config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    /// Logical key: the strategy config file path.
    pub config_path: String,
    pub strategy: String,
    /// Serialized report document.
    pub payload: String,
    pub timestamp_ms: i64,
}

/// Upsert-by-key persistence for report and status snapshots.
///
/// Writes replace the existing row for the key in place; at most one row
/// per key ever exists, and nothing here deletes rows.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn upsert_report(&self, record: &ReportRecord) -> Result<()>;

    /// Replace the singleton status row.
    async fn upsert_status(&self, status: &str, timestamp_ms: i64) -> Result<()>;
}
