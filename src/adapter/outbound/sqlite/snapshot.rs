//! SQLite snapshot store: upsert-by-key persistence for report and status
//! snapshots.
//!
//! Each upsert runs in its own transaction on a pooled connection: look up
//! the row for the key, mutate it in place or build a fresh one, write it
//! back, commit before returning. The primary keys make a second row for
//! the same key unrepresentable.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::OptionalExtension;
use diesel::SqliteConnection;
use tracing::{debug, warn};

use crate::adapter::outbound::sqlite::database::connection::{configure_sqlite_connection, DbPool};
use crate::adapter::outbound::sqlite::database::model::{ReportSnapshotRow, StatusSnapshotRow};
use crate::adapter::outbound::sqlite::database::schema::{report_snapshots, status_snapshots};
use crate::error::{Error, Result};
use crate::port::outbound::snapshot::{ReportRecord, SnapshotStore};

/// Fixed primary key of the singleton status row.
pub const STATUS_KEY: &str = "status";

/// SQLite-backed snapshot store.
pub struct SqliteSnapshotStore {
    /// Shared database connection pool.
    pool: DbPool,
}

impl SqliteSnapshotStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Upsert a report snapshot on a caller-supplied connection.
    ///
    /// # Errors
    /// Returns the underlying Diesel error if the transaction fails.
    pub fn upsert_report_with_conn(
        conn: &mut SqliteConnection,
        record: &ReportRecord,
    ) -> std::result::Result<(), diesel::result::Error> {
        conn.transaction(|conn| {
            let existing: Option<ReportSnapshotRow> = report_snapshots::table
                .find(&record.config_path)
                .first(conn)
                .optional()?;

            let row = match existing {
                Some(mut row) => {
                    row.strategy = record.strategy.clone();
                    row.report = record.payload.clone();
                    row.timestamp_ms = record.timestamp_ms;
                    row
                }
                None => ReportSnapshotRow {
                    config_path: record.config_path.clone(),
                    strategy: record.strategy.clone(),
                    report: record.payload.clone(),
                    timestamp_ms: record.timestamp_ms,
                },
            };

            diesel::replace_into(report_snapshots::table)
                .values(&row)
                .execute(conn)?;

            Ok(())
        })
    }

    /// Upsert the singleton status row on a caller-supplied connection.
    ///
    /// # Errors
    /// Returns the underlying Diesel error if the transaction fails.
    pub fn upsert_status_with_conn(
        conn: &mut SqliteConnection,
        status: &str,
        timestamp_ms: i64,
    ) -> std::result::Result<(), diesel::result::Error> {
        conn.transaction(|conn| {
            let existing: Option<StatusSnapshotRow> = status_snapshots::table
                .find(STATUS_KEY)
                .first(conn)
                .optional()?;

            let row = match existing {
                Some(mut row) => {
                    row.status = status.to_string();
                    row.timestamp_ms = timestamp_ms;
                    row
                }
                None => StatusSnapshotRow {
                    id: STATUS_KEY.to_string(),
                    status: status.to_string(),
                    timestamp_ms,
                },
            };

            diesel::replace_into(status_snapshots::table)
                .values(&row)
                .execute(conn)?;

            Ok(())
        })
    }

}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn upsert_report(&self, record: &ReportRecord) -> Result<()> {
        let mut conn = self.pool.get().map_err(|e| Error::Connection(e.to_string()))?;
        if let Err(e) = configure_sqlite_connection(&mut conn) {
            warn!(error = %e, "Failed to configure SQLite connection");
        }

        Self::upsert_report_with_conn(&mut conn, record)
            .map_err(|e| Error::Database(e.to_string()))?;

        debug!(config_path = %record.config_path, "Report snapshot upserted");
        Ok(())
    }

    async fn upsert_status(&self, status: &str, timestamp_ms: i64) -> Result<()> {
        let mut conn = self.pool.get().map_err(|e| Error::Connection(e.to_string()))?;
        if let Err(e) = configure_sqlite_connection(&mut conn) {
            warn!(error = %e, "Failed to configure SQLite connection");
        }

        Self::upsert_status_with_conn(&mut conn, status, timestamp_ms)
            .map_err(|e| Error::Database(e.to_string()))?;

        debug!(timestamp_ms, "Status snapshot upserted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
    use std::sync::Arc;

    fn setup_store() -> (SqliteSnapshotStore, DbPool) {
        let pool = create_pool(":memory:").expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        (SqliteSnapshotStore::new(pool.clone()), pool)
    }

    fn record(payload: &str, timestamp_ms: i64) -> ReportRecord {
        ReportRecord {
            config_path: "conf/conf_pure_mm_1.yml".to_string(),
            strategy: "pure_market_making".to_string(),
            payload: payload.to_string(),
            timestamp_ms,
        }
    }

    fn report_rows(pool: &DbPool) -> Vec<ReportSnapshotRow> {
        let mut conn = pool.get().unwrap();
        report_snapshots::table.load(&mut conn).unwrap()
    }

    fn status_rows(pool: &DbPool) -> Vec<StatusSnapshotRow> {
        let mut conn = pool.get().unwrap();
        status_snapshots::table.load(&mut conn).unwrap()
    }

    #[tokio::test]
    async fn first_upsert_inserts_a_row() {
        let (store, pool) = setup_store();

        store.upsert_report(&record("{}", 1)).await.unwrap();

        let rows = report_rows(&pool);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].config_path, "conf/conf_pure_mm_1.yml");
    }

    #[tokio::test]
    async fn repeated_upserts_converge_to_the_last_write() {
        let (store, pool) = setup_store();

        for k in 1..=5_i64 {
            store
                .upsert_report(&record(&format!(r#"{{"tick":{k}}}"#), k * 1000))
                .await
                .unwrap();
        }

        let rows = report_rows(&pool);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].report, r#"{"tick":5}"#);
        assert_eq!(rows[0].timestamp_ms, 5000);
    }

    #[tokio::test]
    async fn distinct_keys_get_distinct_rows() {
        let (store, pool) = setup_store();

        store.upsert_report(&record("{}", 1)).await.unwrap();
        store
            .upsert_report(&ReportRecord {
                config_path: "conf/conf_xemm_2.yml".to_string(),
                strategy: "cross_exchange_market_making".to_string(),
                payload: "{}".to_string(),
                timestamp_ms: 2,
            })
            .await
            .unwrap();

        assert_eq!(report_rows(&pool).len(), 2);
    }

    #[tokio::test]
    async fn status_upserts_keep_a_single_row() {
        let (store, pool) = setup_store();

        store.upsert_status("OK", 1000).await.unwrap();
        store.upsert_status("WARN", 2000).await.unwrap();

        let rows = status_rows(&pool);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, STATUS_KEY);
        assert_eq!(rows[0].status, "WARN");
        assert_eq!(rows[0].timestamp_ms, 2000);
    }

    #[tokio::test]
    async fn report_and_status_tables_are_independent() {
        let (store, pool) = setup_store();

        store.upsert_report(&record("{}", 1)).await.unwrap();
        store.upsert_status("OK", 1).await.unwrap();

        assert_eq!(report_rows(&pool).len(), 1);
        assert_eq!(status_rows(&pool).len(), 1);
    }

    #[tokio::test]
    async fn upsert_preserves_other_fields_on_update() {
        let (store, pool) = setup_store();

        store.upsert_report(&record("{}", 1)).await.unwrap();
        store
            .upsert_report(&ReportRecord {
                strategy: "renamed_strategy".to_string(),
                ..record(r#"{"n":2}"#, 2)
            })
            .await
            .unwrap();

        let rows = report_rows(&pool);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].strategy, "renamed_strategy");
        assert_eq!(rows[0].report, r#"{"n":2}"#);
    }

    #[tokio::test]
    async fn with_conn_variant_commits_before_returning() {
        let (_, pool) = setup_store();
        let mut conn = pool.get().unwrap();

        SqliteSnapshotStore::upsert_status_with_conn(&mut conn, "inline", 42).unwrap();
        drop(conn);

        let rows = status_rows(&pool);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "inline");
    }

    #[tokio::test]
    async fn concurrent_upserts_to_one_key_leave_one_row() {
        let pool = create_pool("file:snapshot_upsert_race?mode=memory&cache=shared").unwrap();
        run_migrations(&pool).unwrap();
        let store = Arc::new(SqliteSnapshotStore::new(pool.clone()));

        let mut handles = vec![];
        for k in 0..8_i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .upsert_status(&format!("tick {k}"), k)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(status_rows(&pool).len(), 1);
    }
}
