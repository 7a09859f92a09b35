// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Durable store for accepted registration records.
//!
//! Append-only log of `(identifier, event_date)` pairs backed by SQLite.
//! Rows are immutable once written; the only mutation besides insert is
//! the sweeper's bulk delete. Duplicate identifier/date pairs are
//! expected, one row per accepted attempt.

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use thiserror::Error;

/// Surrogate key assigned by the store. Storage-layer identity only,
/// never consulted by the admission logic.
pub type RecordId = i64;

/// The backing medium is unreachable or rejected an operation.
///
/// Callers on the admission path must treat this as a rejection of the
/// attempt, never as "under limit".
#[derive(Debug, Error)]
#[error("registration store unavailable: {0}")]
pub struct StoreError(#[from] sqlx::Error);

/// SQLite-backed registration record store.
#[derive(Clone)]
pub struct RecordStore {
    db: SqlitePool,
}

impl RecordStore {
    /// Open (creating if missing) a file-backed store.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let db = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { db })
    }

    /// Open an in-memory store.
    ///
    /// Pinned to a single pooled connection that never expires: each
    /// SQLite in-memory connection is its own database, so the pool must
    /// not rotate it.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { db })
    }

    /// Create the backing table and index. No-op if they already exist.
    pub async fn setup(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS registrations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ip_address TEXT NOT NULL,
                event_date TEXT NOT NULL
            )",
        )
        .execute(&self.db)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS registrations_ip_date_idx
                ON registrations (ip_address, event_date)",
        )
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Drop the backing table. No-op if it is already absent.
    pub async fn teardown(&self) -> Result<(), StoreError> {
        sqlx::query("DROP TABLE IF EXISTS registrations")
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Append one record for an accepted registration.
    ///
    /// Duplicate identifier/date pairs are meaningful (one row per
    /// accepted attempt) and never conflict.
    pub async fn insert(
        &self,
        identifier: &str,
        event_date: NaiveDate,
    ) -> Result<RecordId, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO registrations (ip_address, event_date) VALUES (?1, ?2) RETURNING id",
        )
        .bind(identifier)
        .bind(event_date)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    /// Exact count of records for this identifier on this date.
    pub async fn count_matching(
        &self,
        identifier: &str,
        event_date: NaiveDate,
    ) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE ip_address = ?1 AND event_date = ?2",
        )
        .bind(identifier)
        .bind(event_date)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    /// Delete every record strictly older than `cutoff`, in one
    /// statement. Returns the number deleted; a repeat run with the same
    /// cutoff deletes nothing.
    pub async fn delete_older_than(&self, cutoff: NaiveDate) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM registrations WHERE event_date < ?1")
            .bind(cutoff)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fresh_store() -> RecordStore {
        let store = RecordStore::open_in_memory().await.unwrap();
        store.setup().await.unwrap();
        store
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn setup_and_teardown_are_idempotent() {
        let store = RecordStore::open_in_memory().await.unwrap();
        store.setup().await.unwrap();
        store.setup().await.unwrap();
        store.teardown().await.unwrap();
        store.teardown().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_pairs_are_distinct_records() {
        let store = fresh_store().await;
        let day = date("2026-08-01");

        let a = store.insert("203.0.113.7", day).await.unwrap();
        let b = store.insert("203.0.113.7", day).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.count_matching("203.0.113.7", day).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn count_is_scoped_to_identifier_and_date() {
        let store = fresh_store().await;
        store.insert("10.0.0.1", date("2026-08-01")).await.unwrap();
        store.insert("10.0.0.1", date("2026-08-02")).await.unwrap();
        store.insert("10.0.0.2", date("2026-08-01")).await.unwrap();

        assert_eq!(
            store
                .count_matching("10.0.0.1", date("2026-08-01"))
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .count_matching("10.0.0.3", date("2026-08-01"))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn delete_older_than_is_strict_and_idempotent() {
        let store = fresh_store().await;
        store.insert("10.0.0.1", date("2026-06-30")).await.unwrap();
        store.insert("10.0.0.1", date("2026-07-01")).await.unwrap();
        store.insert("10.0.0.1", date("2026-07-02")).await.unwrap();

        let cutoff = date("2026-07-01");
        assert_eq!(store.delete_older_than(cutoff).await.unwrap(), 1);
        // Record dated exactly at the cutoff is retained.
        assert_eq!(
            store
                .count_matching("10.0.0.1", date("2026-07-01"))
                .await
                .unwrap(),
            1
        );
        assert_eq!(store.delete_older_than(cutoff).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn file_backed_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registrations.db");

        let store = RecordStore::open(&path).await.unwrap();
        store.setup().await.unwrap();
        store.insert("10.0.0.1", date("2026-08-01")).await.unwrap();
        assert_eq!(
            store
                .count_matching("10.0.0.1", date("2026-08-01"))
                .await
                .unwrap(),
            1
        );
    }
}
