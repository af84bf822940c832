//! Outbound adapters: balance sources and SQLite persistence.

pub mod balances;
pub mod sqlite;
