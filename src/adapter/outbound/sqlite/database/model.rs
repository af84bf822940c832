//! Database row types for Diesel.

use diesel::prelude::*;

use super::schema::{report_snapshots, status_snapshots};

/// Row holding the latest report for one strategy config file.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = report_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReportSnapshotRow {
    pub config_path: String,
    pub strategy: String,
    pub report: String,
    pub timestamp_ms: i64,
}

/// The singleton status row.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = status_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatusSnapshotRow {
    pub id: String,
    pub status: String,
    pub timestamp_ms: i64,
}
