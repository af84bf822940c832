//! Pulseboard - background performance reporting for trading bots.
//!
//! A long-running trading process embeds this crate to periodically
//! compute performance reports, keep exactly one persisted snapshot per
//! strategy config file, and stream freeform status text to an external
//! channel in bounded, throttled chunks.
//!
//! # Architecture
//!
//! Hexagonal: the host application implements the outbound ports, the
//! notifier composes the loops.
//!
//! - [`app::ReportNotifier`] - lifecycle owner; periodic report and
//!   status loops plus the queue-drain worker
//! - [`app::ReportAggregator`] - partitions fills by (market, pair) and
//!   assembles the report document
//! - [`app::scheduler`] - cancellable, non-overlapping periodic tasks
//! - [`app::batcher`] - pure line chunking for outbound messages
//! - [`adapter::outbound::sqlite`] - upsert-by-key snapshot persistence
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with reporting knobs and logging init
//! - [`domain`] - trade fills, metric shapes, the report document
//! - [`error`] - error types for the crate
//! - [`port`] - traits the host implements (fills, balances, performance
//!   engine, sink, snapshot store, status gates)
//! - [`adapter`] - stock balance sources and the SQLite store
//! - [`app`] - the notifier and its background loops
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pulseboard::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
//! use pulseboard::adapter::outbound::sqlite::SqliteSnapshotStore;
//! use pulseboard::config::Config;
//!
//! let config = Config::load("pulseboard.toml").unwrap();
//! config.init_logging();
//!
//! let pool = create_pool(&config.database.url).unwrap();
//! run_migrations(&pool).unwrap();
//! let store = Arc::new(SqliteSnapshotStore::new(pool));
//! // Wire store + the host's port implementations into a ReportNotifier,
//! // then notifier.start().
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
