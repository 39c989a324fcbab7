//! Settlement ledger. Rows are append-only: the form inserts, dashboards
//! read, and nothing ever updates or deletes.

use super::*;
use chrono::NaiveDate;
use rusqlite::params;

use crate::roster::{self, Track};

impl ReportsDb {
    /// Append a settlement row, returning its assigned id.
    ///
    /// Validation failures surface as `DbError::Validation` before any SQL
    /// runs. Blank `tod` values are stored as NULL.
    pub fn append_settlement(&self, new: &NewSettlement) -> Result<i64, DbError> {
        let client = new.client_name.trim();
        if client.is_empty() {
            return Err(DbError::Validation("Client name is required".to_string()));
        }
        if !roster::is_roster_person(&new.person_name) {
            return Err(DbError::Validation(format!(
                "Unknown staff member: {}",
                new.person_name
            )));
        }
        for (field, amount) in [
            ("Settlement amount", new.settlement_amount),
            ("Policy limits", new.policy_limits),
            ("Fee earned", new.fee_earned),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(DbError::Validation(format!(
                    "{} must be a non-negative amount",
                    field
                )));
            }
        }

        let tod = new
            .tod
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        self.with_retry("append_settlement", |conn| {
            conn.execute(
                "INSERT INTO settlements
                 (person_name, client_name, settlement_amount, policy_limits,
                  fee_earned, settlement_date, tod, track)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    new.person_name,
                    client,
                    new.settlement_amount,
                    new.policy_limits,
                    new.fee_earned,
                    new.settlement_date.to_string(),
                    tod,
                    new.track.as_str(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All settlements with `settlement_date` in `[start, end]` inclusive,
    /// optionally restricted to one track. Most recent first, ties broken by
    /// insertion order.
    pub fn settlements_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        track: Option<Track>,
    ) -> Result<Vec<DbSettlement>, DbError> {
        let track_filter = track.map(|t| t.as_str());
        self.with_retry("settlements_in_range", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, person_name, client_name, settlement_amount, policy_limits,
                        fee_earned, settlement_date, tod, track, created_at
                 FROM settlements
                 WHERE settlement_date BETWEEN ?1 AND ?2
                   AND (?3 IS NULL OR track = ?3)
                 ORDER BY settlement_date DESC, id DESC",
            )?;
            let rows = stmt.query_map(
                params![start.to_string(), end.to_string(), track_filter],
                Self::map_settlement_row,
            )?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    /// Most recent settlements across all dates, for the ledger listing view.
    pub fn recent_settlements(&self, limit: u32) -> Result<Vec<DbSettlement>, DbError> {
        self.with_retry("recent_settlements", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, person_name, client_name, settlement_amount, policy_limits,
                        fee_earned, settlement_date, tod, track, created_at
                 FROM settlements
                 ORDER BY settlement_date DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], Self::map_settlement_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    /// Pre-suit settlements, optionally restricted to one `YYYY-MM` month.
    /// Most recent first, ties broken by insertion order.
    pub fn presuit_settlements(&self, month: Option<&str>) -> Result<Vec<DbSettlement>, DbError> {
        self.with_retry("presuit_settlements", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, person_name, client_name, settlement_amount, policy_limits,
                        fee_earned, settlement_date, tod, track, created_at
                 FROM settlements
                 WHERE track = 'pre_suit'
                   AND (?1 IS NULL OR strftime('%Y-%m', settlement_date) = ?1)
                 ORDER BY settlement_date DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![month], Self::map_settlement_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    /// Distinct `YYYY-MM` months carrying at least one pre-suit settlement,
    /// newest first.
    pub fn presuit_settlement_months(&self) -> Result<Vec<String>, DbError> {
        self.with_retry("presuit_settlement_months", |conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT strftime('%Y-%m', settlement_date)
                 FROM settlements
                 WHERE track = 'pre_suit'
                 ORDER BY 1 DESC",
            )?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    fn map_settlement_row(row: &rusqlite::Row) -> rusqlite::Result<DbSettlement> {
        let track: String = row.get(8)?;
        Ok(DbSettlement {
            id: row.get(0)?,
            person_name: row.get(1)?,
            client_name: row.get(2)?,
            settlement_amount: row.get(3)?,
            policy_limits: row.get(4)?,
            fee_earned: row.get(5)?,
            settlement_date: row.get(6)?,
            tod: row.get(7)?,
            track: Track::from_str_lossy(&track),
            created_at: row.get(9)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn sample(person: &str, client: &str, date: &str, track: Track) -> NewSettlement {
        NewSettlement {
            person_name: person.to_string(),
            client_name: client.to_string(),
            settlement_amount: 100_000.0,
            policy_limits: 250_000.0,
            fee_earned: 33_333.0,
            settlement_date: date.parse().expect("valid test date"),
            tod: None,
            track,
        }
    }

    #[test]
    fn test_append_assigns_monotonic_ids() {
        let db = test_db();
        let first = db
            .append_settlement(&sample("Emma", "Doe v. Acme", "2026-03-14", Track::PreSuit))
            .expect("first append");
        let second = db
            .append_settlement(&sample("Emma", "Roe v. Acme", "2026-03-01", Track::PreSuit))
            .expect("second append");
        assert!(second > first, "ids must grow with insertion order");
    }

    #[test]
    fn test_append_rejects_blank_client() {
        let db = test_db();
        let err = db
            .append_settlement(&sample("Emma", "   ", "2026-03-14", Track::Unknown))
            .expect_err("blank client must be rejected");
        assert!(err.is_validation());

        let count: i64 = db
            .conn_ref()
            .query_row("SELECT COUNT(*) FROM settlements", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 0, "rejected rows must not be persisted");
    }

    #[test]
    fn test_append_rejects_unknown_person() {
        let db = test_db();
        let err = db
            .append_settlement(&sample("Mallory", "Doe v. Acme", "2026-03-14", Track::Unknown))
            .expect_err("non-roster person must be rejected");
        assert!(err.is_validation());
    }

    #[test]
    fn test_append_rejects_negative_amounts() {
        let db = test_db();
        let mut new = sample("David", "Doe v. Acme", "2026-03-14", Track::Litigation);
        new.fee_earned = -5.0;
        let err = db.append_settlement(&new).expect_err("negative fee");
        assert!(err.is_validation());

        new.fee_earned = f64::NAN;
        let err = db.append_settlement(&new).expect_err("NaN fee");
        assert!(err.is_validation());
    }

    #[test]
    fn test_append_stores_blank_tod_as_null() {
        let db = test_db();
        let mut new = sample("Caroline", "Doe v. Acme", "2026-03-14", Track::PreSuit);
        new.tod = Some("   ".to_string());
        let id = db.append_settlement(&new).expect("append");

        let tod: Option<String> = db
            .conn_ref()
            .query_row("SELECT tod FROM settlements WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .expect("query tod");
        assert_eq!(tod, None);

        new.tod = Some(" rear-end collision ".to_string());
        let id = db.append_settlement(&new).expect("append");
        let tod: Option<String> = db
            .conn_ref()
            .query_row("SELECT tod FROM settlements WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .expect("query tod");
        assert_eq!(tod.as_deref(), Some("rear-end collision"));
    }

    #[test]
    fn test_range_query_is_inclusive() {
        let db = test_db();
        db.append_settlement(&sample("Emma", "On start", "2026-01-01", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "On end", "2026-01-31", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "Outside", "2026-02-01", Track::PreSuit))
            .expect("append");

        let rows = db
            .settlements_in_range(
                "2026-01-01".parse().expect("date"),
                "2026-01-31".parse().expect("date"),
                None,
            )
            .expect("query");
        let clients: Vec<&str> = rows.iter().map(|r| r.client_name.as_str()).collect();
        assert_eq!(clients, vec!["On end", "On start"]);
    }

    #[test]
    fn test_range_query_track_filter() {
        let db = test_db();
        db.append_settlement(&sample("Emma", "Pre", "2026-01-10", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "Lit", "2026-01-11", Track::Litigation))
            .expect("append");
        db.append_settlement(&sample("Emma", "Unk", "2026-01-12", Track::Unknown))
            .expect("append");

        let start: NaiveDate = "2026-01-01".parse().expect("date");
        let end: NaiveDate = "2026-01-31".parse().expect("date");

        let pre = db
            .settlements_in_range(start, end, Some(Track::PreSuit))
            .expect("query");
        assert_eq!(pre.len(), 1);
        assert_eq!(pre[0].client_name, "Pre");

        let all = db.settlements_in_range(start, end, None).expect("query");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_listing_orders_by_date_then_insertion() {
        let db = test_db();
        let early = db
            .append_settlement(&sample("David", "Same day, first", "2026-03-14", Track::Unknown))
            .expect("append");
        let late = db
            .append_settlement(&sample("David", "Same day, second", "2026-03-14", Track::Unknown))
            .expect("append");
        db.append_settlement(&sample("David", "Older", "2026-03-01", Track::Unknown))
            .expect("append");

        let rows = db.recent_settlements(200).expect("listing");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, late);
        assert_eq!(rows[1].id, early);
        assert_eq!(rows[2].client_name, "Older");
    }

    #[test]
    fn test_inverted_range_yields_no_rows() {
        let db = test_db();
        db.append_settlement(&sample("Emma", "Doe v. Acme", "2026-03-14", Track::PreSuit))
            .expect("append");
        let rows = db
            .settlements_in_range(
                "2026-12-31".parse().expect("date"),
                "2026-01-01".parse().expect("date"),
                None,
            )
            .expect("query");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_presuit_settlements_month_filter() {
        let db = test_db();
        db.append_settlement(&sample("Emma", "March A", "2026-03-05", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "March B", "2026-03-20", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "January", "2026-01-10", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "Lit March", "2026-03-15", Track::Litigation))
            .expect("append");

        let march = db.presuit_settlements(Some("2026-03")).expect("filtered");
        let clients: Vec<&str> = march.iter().map(|r| r.client_name.as_str()).collect();
        assert_eq!(clients, vec!["March B", "March A"]);

        let all = db.presuit_settlements(None).expect("all");
        assert_eq!(all.len(), 3, "litigation rows never appear");
    }

    #[test]
    fn test_presuit_months_distinct_newest_first() {
        let db = test_db();
        db.append_settlement(&sample("Emma", "A", "2026-01-15", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "B", "2026-01-20", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "C", "2026-03-02", Track::PreSuit))
            .expect("append");
        db.append_settlement(&sample("Emma", "Lit only", "2026-04-01", Track::Litigation))
            .expect("append");

        let months = db.presuit_settlement_months().expect("months");
        assert_eq!(months, vec!["2026-03", "2026-01"]);
    }
}
