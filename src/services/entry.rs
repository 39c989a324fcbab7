// Entry service
// Settlement and monthly KPI form submissions, plus the recent-entry
// listings shown beneath each form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{DbKpiRecord, DbSettlement, KpiMetrics, NewSettlement, ReportsDb};
use crate::helpers::month_key;
use crate::roster::Track;

/// Rows shown in a recent-entry listing.
const LISTING_LIMIT: u32 = 200;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementForm {
    pub person_name: String,
    pub client_name: String,
    pub settlement_amount: f64,
    pub policy_limits: f64,
    pub fee_earned: f64,
    pub settlement_date: NaiveDate,
    #[serde(default)]
    pub tod: String,
    #[serde(default)]
    pub track: Track,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SettlementSaveResult {
    Saved { id: i64 },
    Invalid { message: String },
    Error { message: String },
}

pub fn record_settlement(db: &ReportsDb, form: &SettlementForm) -> SettlementSaveResult {
    let new = NewSettlement {
        person_name: form.person_name.clone(),
        client_name: form.client_name.clone(),
        settlement_amount: form.settlement_amount,
        policy_limits: form.policy_limits,
        fee_earned: form.fee_earned,
        settlement_date: form.settlement_date,
        // Blank values normalize to NULL in append_settlement
        tod: Some(form.tod.clone()),
        track: form.track,
    };

    match db.append_settlement(&new) {
        Ok(id) => {
            log::info!(
                "Recorded settlement #{} for {} ({})",
                id,
                new.person_name,
                new.track.as_str()
            );
            SettlementSaveResult::Saved { id }
        }
        Err(err) if err.is_validation() => SettlementSaveResult::Invalid {
            message: err.to_string(),
        },
        Err(err) => {
            log::error!("Failed to record settlement: {}", err);
            SettlementSaveResult::Error {
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiForm {
    pub person_name: String,
    pub year: i32,
    pub month: u32,
    pub demands_sent: i64,
    pub settlements_amount: f64,
    pub avg_lien_resolution_days: f64,
    pub files_without_14_day_contact: i64,
    pub nps_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum KpiSaveResult {
    Saved { created: bool },
    Invalid { message: String },
    Error { message: String },
}

pub fn save_monthly_kpis(db: &ReportsDb, form: &KpiForm) -> KpiSaveResult {
    let month = month_key(form.year, form.month);
    let metrics = KpiMetrics {
        demands_sent: form.demands_sent,
        settlements_amount: form.settlements_amount,
        avg_lien_resolution_days: form.avg_lien_resolution_days,
        files_without_14_day_contact: form.files_without_14_day_contact,
        nps_score: form.nps_score,
    };

    match db.upsert_kpis(&form.person_name, &month, &metrics) {
        Ok(created) => {
            log::info!(
                "Saved KPIs for {} {} ({})",
                form.person_name,
                month,
                if created { "new" } else { "updated" }
            );
            KpiSaveResult::Saved { created }
        }
        Err(err) if err.is_validation() => KpiSaveResult::Invalid {
            message: err.to_string(),
        },
        Err(err) => {
            log::error!("Failed to save KPIs: {}", err);
            KpiSaveResult::Error {
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SettlementLogResult {
    Success { data: Vec<DbSettlement> },
    Empty { message: String },
    Error { message: String },
}

pub fn settlement_log(db: &ReportsDb) -> SettlementLogResult {
    match db.recent_settlements(LISTING_LIMIT) {
        Ok(rows) if rows.is_empty() => SettlementLogResult::Empty {
            message: "No settlements recorded yet".to_string(),
        },
        Ok(rows) => SettlementLogResult::Success { data: rows },
        Err(err) => {
            log::error!("Failed to load settlement log: {}", err);
            SettlementLogResult::Error {
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum KpiLogResult {
    Success { data: Vec<DbKpiRecord> },
    Empty { message: String },
    Error { message: String },
}

pub fn kpi_log(db: &ReportsDb) -> KpiLogResult {
    match db.recent_kpis(LISTING_LIMIT) {
        Ok(rows) if rows.is_empty() => KpiLogResult::Empty {
            message: "No KPI entries recorded yet".to_string(),
        },
        Ok(rows) => KpiLogResult::Success { data: rows },
        Err(err) => {
            log::error!("Failed to load KPI log: {}", err);
            KpiLogResult::Error {
                message: err.to_string(),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
