//! Key/value settings store. Values are strings; callers parse. Writes are
//! last-write-wins with no history.

use super::*;
use rusqlite::{params, OptionalExtension};

/// Seeded at first initialization. `INSERT OR IGNORE` keeps any value a user
/// has already saved.
const DEFAULT_SETTINGS: [(&str, &str); 3] = [
    ("revenue_goal_2026", "0"),
    ("google_reviews_baseline", "221"),
    ("google_reviews_current", "221"),
];

impl ReportsDb {
    /// Stored value for `key`, or `default` when the key has never been set.
    /// A missing key is not an error.
    pub fn get_setting(&self, key: &str, default: &str) -> Result<String, DbError> {
        let value = self.with_retry("get_setting", |conn| {
            conn.query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })?;
        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    /// Insert or replace `key`, refreshing `updated_at`.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.with_retry("set_setting", |conn| {
            conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = datetime('now')",
                params![key, value],
            )?;
            Ok(())
        })
    }

    pub(crate) fn seed_default_settings(&self) -> Result<(), DbError> {
        self.with_retry("seed_default_settings", |conn| {
            for (key, value) in DEFAULT_SETTINGS {
                conn.execute(
                    "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )?;
            }
            Ok(())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::db::test_utils::test_db;

    #[test]
    fn test_get_returns_default_when_missing() {
        let db = test_db();
        let value = db.get_setting("no_such_key", "fallback").expect("get");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_set_then_get_last_write_wins() {
        let db = test_db();
        db.set_setting("revenue_goal_2027", "500000").expect("set");
        db.set_setting("revenue_goal_2027", "650000").expect("set again");
        let value = db.get_setting("revenue_goal_2027", "0").expect("get");
        assert_eq!(value, "650000");
    }

    #[test]
    fn test_seeding_keeps_existing_values() {
        let db = test_db();
        db.set_setting("google_reviews_current", "240").expect("set");
        db.seed_default_settings().expect("reseed");
        let value = db
            .get_setting("google_reviews_current", "221")
            .expect("get");
        assert_eq!(value, "240");
    }
}
