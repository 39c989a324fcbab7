//! Pre-suit KPI ledger. One logical row per (person, month); saving again for
//! the same key replaces all five metric fields together.

use super::*;
use rusqlite::params;

use crate::helpers::parse_month_key;
use crate::roster;

impl ReportsDb {
    /// Insert or replace the KPI row for `(person, month)`. Returns `true`
    /// when a new row was created, `false` when an existing row was replaced.
    ///
    /// `month` must be a strict `YYYY-MM` key. `created_at` keeps the
    /// timestamp of the first save.
    pub fn upsert_kpis(
        &self,
        person: &str,
        month: &str,
        metrics: &KpiMetrics,
    ) -> Result<bool, DbError> {
        if !roster::is_roster_person(person) {
            return Err(DbError::Validation(format!(
                "Unknown staff member: {}",
                person
            )));
        }
        if parse_month_key(month).is_none() {
            return Err(DbError::Validation(format!(
                "Month must be formatted YYYY-MM, got '{}'",
                month
            )));
        }
        if metrics.demands_sent < 0 || metrics.files_without_14_day_contact < 0 {
            return Err(DbError::Validation(
                "Counts cannot be negative".to_string(),
            ));
        }
        if !metrics.avg_lien_resolution_days.is_finite() || metrics.avg_lien_resolution_days < 0.0
        {
            return Err(DbError::Validation(
                "Lien resolution days must be a non-negative number".to_string(),
            ));
        }
        if !metrics.settlements_amount.is_finite() {
            return Err(DbError::Validation(
                "Settlements amount must be a number".to_string(),
            ));
        }
        if !metrics.nps_score.is_finite() || !(0.0..=5.0).contains(&metrics.nps_score) {
            return Err(DbError::Validation(
                "NPS score must be between 0 and 5".to_string(),
            ));
        }

        self.with_retry("upsert_kpis", |conn| {
            // The created flag is advisory: the pre-check and the upsert are
            // separate statements, so a concurrent writer can race it.
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM pre_suit_kpis WHERE person_name = ?1 AND month = ?2)",
                params![person, month],
                |row| row.get(0),
            )?;
            conn.execute(
                "INSERT INTO pre_suit_kpis
                 (person_name, month, demands_sent, settlements_amount,
                  avg_lien_resolution_days, files_without_14_day_contact, nps_score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(person_name, month) DO UPDATE SET
                   demands_sent = excluded.demands_sent,
                   settlements_amount = excluded.settlements_amount,
                   avg_lien_resolution_days = excluded.avg_lien_resolution_days,
                   files_without_14_day_contact = excluded.files_without_14_day_contact,
                   nps_score = excluded.nps_score",
                params![
                    person,
                    month,
                    metrics.demands_sent,
                    metrics.settlements_amount,
                    metrics.avg_lien_resolution_days,
                    metrics.files_without_14_day_contact,
                    metrics.nps_score,
                ],
            )?;
            Ok(!exists)
        })
    }

    /// KPI rows, optionally filtered by person and/or month. Newest month
    /// first, people alphabetical within a month.
    pub fn kpis_for(
        &self,
        person: Option<&str>,
        month: Option<&str>,
    ) -> Result<Vec<DbKpiRecord>, DbError> {
        self.with_retry("kpis_for", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, person_name, month, demands_sent, settlements_amount,
                        avg_lien_resolution_days, files_without_14_day_contact,
                        nps_score, created_at
                 FROM pre_suit_kpis
                 WHERE (?1 IS NULL OR person_name = ?1)
                   AND (?2 IS NULL OR month = ?2)
                 ORDER BY month DESC, person_name ASC",
            )?;
            let rows = stmt.query_map(params![person, month], Self::map_kpi_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    /// Most recent KPI rows for the ledger listing view.
    pub fn recent_kpis(&self, limit: u32) -> Result<Vec<DbKpiRecord>, DbError> {
        self.with_retry("recent_kpis", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, person_name, month, demands_sent, settlements_amount,
                        avg_lien_resolution_days, files_without_14_day_contact,
                        nps_score, created_at
                 FROM pre_suit_kpis
                 ORDER BY month DESC, person_name ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], Self::map_kpi_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    /// Distinct `YYYY-MM` months with at least one KPI row, newest first.
    pub fn kpi_months(&self) -> Result<Vec<String>, DbError> {
        self.with_retry("kpi_months", |conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT month FROM pre_suit_kpis ORDER BY month DESC",
            )?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    fn map_kpi_row(row: &rusqlite::Row) -> rusqlite::Result<DbKpiRecord> {
        Ok(DbKpiRecord {
            id: row.get(0)?,
            person_name: row.get(1)?,
            month: row.get(2)?,
            demands_sent: row.get(3)?,
            settlements_amount: row.get(4)?,
            avg_lien_resolution_days: row.get(5)?,
            files_without_14_day_contact: row.get(6)?,
            nps_score: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
