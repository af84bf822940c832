//! Domain types: trade fills, performance metrics, report documents,
//! and the notifier lifecycle state machine.

pub mod metrics;
pub mod report;
pub mod state;
pub mod trade;

pub use metrics::{smart_round, PerfMetrics};
pub use report::{MarketSection, Report, TimeWindow};
pub use state::NotifierState;
pub use trade::{TradeFill, TradeSide};
