//! Application layer: the notifier and the pieces it composes.

pub mod aggregator;
pub mod batcher;
pub mod checks;
pub mod notifier;
pub mod scheduler;

pub use aggregator::ReportAggregator;
pub use batcher::chunk_lines;
pub use checks::{CheckOutcome, StatusChecks};
pub use notifier::{NotifierDeps, ReportNotifier};
pub use scheduler::{spawn_periodic, PeriodicTask};
