//! Outbound message sink port.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;

/// Destination for status text chunks (a chat channel, a webhook, ...).
///
/// Delivery failures are logged by the drain loop and never propagated;
/// implementations should return an error rather than retry internally.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, chunk: &str) -> Result<()>;
}

/// Sink that logs chunks via tracing. Useful when no external channel is
/// configured.
pub struct LogSink;

#[async_trait]
impl MessageSink for LogSink {
    async fn deliver(&self, chunk: &str) -> Result<()> {
        info!(chunk = %chunk, "Status chunk");
        Ok(())
    }
}

/// Sink that drops chunks. For tests and disabled channels.
pub struct NullSink;

#[async_trait]
impl MessageSink for NullSink {
    async fn deliver(&self, _chunk: &str) -> Result<()> {
        Ok(())
    }
}
