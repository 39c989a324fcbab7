//! SQLite-backed storage for the settlement ledger, the pre-suit KPI ledger,
//! and the settings store.
//!
//! The database lives at `~/.firmpulse/firmpulse.db`. Writes are single
//! statements with no cross-statement transactions: settlements are
//! append-only, KPI rows are keyed upserts, and settings race last-write-wins.
//! Transient SQLite errors (busy/locked) are retried with exponential backoff
//! before surfacing to the caller.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;

pub mod types;
pub use types::*;

pub mod kpis;
pub mod settings;
pub mod settlements;

/// Attempts per storage operation before a transient error becomes fatal.
const RETRY_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt; doubles each retry.
const RETRY_BASE_DELAY_MS: u64 = 600;

/// Busy and locked are contention signals worth retrying. Everything else
/// (constraint violations, syntax, corruption) propagates immediately.
fn is_transient(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked)
    )
}

pub struct ReportsDb {
    conn: Connection,
}

impl ReportsDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) the database at `~/.firmpulse/firmpulse.db`, apply
    /// pending migrations, and seed default settings.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL keeps dashboard reads cheap while a form submission writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        let db = Self { conn };
        db.seed_default_settings()?;
        Ok(db)
    }

    /// Resolve the default database path: `~/.firmpulse/firmpulse.db`.
    fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".firmpulse").join("firmpulse.db"))
    }

    /// Run a storage operation, retrying transient busy/locked errors with
    /// exponential backoff. Exhaustion returns the final error.
    pub(crate) fn with_retry<T, F>(&self, op: &str, mut f: F) -> Result<T, DbError>
    where
        F: FnMut(&Connection) -> Result<T, rusqlite::Error>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f(&self.conn) {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) && attempt + 1 < RETRY_ATTEMPTS => {
                    let delay = Duration::from_millis(RETRY_BASE_DELAY_MS << attempt);
                    log::warn!(
                        "{}: transient SQLite error (attempt {}/{}), retrying in {}ms: {}",
                        op,
                        attempt + 1,
                        RETRY_ATTEMPTS,
                        delay.as_millis(),
                        err
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(DbError::Sqlite(err)),
            }
        }
    }
}

pub mod test_utils {
    use super::ReportsDb;

    /// Create a temporary database for testing.
    ///
    /// We leak the `TempDir` so the directory persists for the duration of the
    /// test. Test temp dirs are cleaned up by the OS.
    pub fn test_db() -> ReportsDb {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        std::mem::forget(dir);
        ReportsDb::open_at(path).expect("Failed to open test database")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::test_utils::test_db;
    use super::*;

    #[test]
    fn test_open_creates_tables() {
        let db = test_db();
        for table in ["settlements", "pre_suit_kpis", "settings"] {
            let count: i64 = db
                .conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM {}", table),
                    [],
                    |row| row.get(0),
                )
                .unwrap_or_else(|_| panic!("{} table should exist", table));
            let expected = if table == "settings" { 3 } else { 0 };
            assert_eq!(count, expected, "{} row count after open", table);
        }
    }

    #[test]
    fn test_open_seeds_defaults() {
        let db = test_db();
        let goal: String = db
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = 'revenue_goal_2026'",
                [],
                |row| row.get(0),
            )
            .expect("seeded revenue goal");
        assert_eq!(goal, "0");

        for key in ["google_reviews_baseline", "google_reviews_current"] {
            let value: String = db
                .conn
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .expect("seeded review counter");
            assert_eq!(value, "221");
        }
    }

    #[test]
    fn test_reopen_does_not_overwrite_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reopen.db");

        {
            let db = ReportsDb::open_at(path.clone()).expect("first open");
            db.set_setting("revenue_goal_2026", "75000").expect("set goal");
        }

        let db = ReportsDb::open_at(path).expect("second open");
        let goal = db.get_setting("revenue_goal_2026", "0").expect("get goal");
        assert_eq!(goal, "75000", "seeding must not overwrite existing values");
    }

    #[test]
    fn test_non_transient_errors_propagate_immediately() {
        let db = test_db();
        let started = std::time::Instant::now();
        let result = db.with_retry("bad_sql", |conn| {
            conn.execute("THIS IS NOT SQL", [])
        });
        assert!(result.is_err());
        assert!(
            started.elapsed() < Duration::from_millis(500),
            "syntax errors must not trigger backoff sleeps"
        );
    }

    fn busy_error() -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        )
    }

    #[test]
    fn test_transient_error_retries_then_succeeds() {
        let db = test_db();
        let calls = std::cell::Cell::new(0u32);
        let value = db
            .with_retry("flaky_op", |_conn| {
                calls.set(calls.get() + 1);
                if calls.get() < RETRY_ATTEMPTS {
                    Err(busy_error())
                } else {
                    Ok(42)
                }
            })
            .expect("final attempt should succeed");
        assert_eq!(value, 42);
        assert_eq!(calls.get(), RETRY_ATTEMPTS, "two busy failures, then success");
    }

    #[test]
    fn test_transient_error_exhausts_attempts() {
        let db = test_db();
        let calls = std::cell::Cell::new(0u32);
        let err = db
            .with_retry::<i64, _>("always_busy", |_conn| {
                calls.set(calls.get() + 1);
                Err(busy_error())
            })
            .expect_err("exhaustion surfaces the final error");
        assert!(matches!(err, DbError::Sqlite(_)));
        assert_eq!(
            calls.get(),
            RETRY_ATTEMPTS,
            "no further attempts after exhaustion"
        );
    }

    #[test]
    fn test_transient_classification() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(is_transient(&busy));

        let locked = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(is_transient(&locked));

        let constraint = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            None,
        );
        assert!(!is_transient(&constraint));
    }
}
