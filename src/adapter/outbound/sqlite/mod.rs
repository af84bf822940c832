//! SQLite persistence adapter.

pub mod database;
pub mod snapshot;

pub use snapshot::{SqliteSnapshotStore, STATUS_KEY};
