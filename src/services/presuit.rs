// Pre-suit service
// KPI dashboard for the pre-suit team: month selector options, per-person KPI
// summaries, and pre-suit settlement boxes for the selected month.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::db::{DbKpiRecord, ReportsDb};
use crate::roster::PEOPLE;
use crate::services::dashboard::{self, PersonBox};

/// Per-person KPI rollup. Every field is None when no KPI row matched; a
/// recorded zero stays `Some(0)`, so "no data" and "zero" render differently.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub person_name: String,
    pub demands_sent: Option<i64>,
    pub settlements_amount: Option<f64>,
    pub avg_lien_resolution_days: Option<f64>,
    pub files_without_14_day_contact: Option<i64>,
    pub nps_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresuitDashboard {
    /// Selected month, None when viewing all months.
    pub month_filter: Option<String>,
    /// Months offered by the selector: KPI-ledger months merged with pre-suit
    /// settlement months, newest first.
    pub month_options: Vec<String>,
    pub kpi_summaries: Vec<KpiSummary>,
    pub people: Vec<PersonBox>,
}

#[derive(Debug, Serialize)]
#[allow(clippy::large_enum_variant)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PresuitResult {
    Success { data: PresuitDashboard },
    Empty { message: String },
    Error { message: String },
}

pub fn presuit_dashboard(db: &ReportsDb, month: Option<&str>) -> PresuitResult {
    let kpi_months = match db.kpi_months() {
        Ok(months) => months,
        Err(err) => return error("Failed to load KPI months", err),
    };
    let settlement_months = match db.presuit_settlement_months() {
        Ok(months) => months,
        Err(err) => return error("Failed to load pre-suit months", err),
    };

    let month_options = merge_months(kpi_months, settlement_months);
    if month_options.is_empty() {
        return PresuitResult::Empty {
            message: "No pre-suit data recorded yet".to_string(),
        };
    }

    let kpi_rows = match db.kpis_for(None, month) {
        Ok(rows) => rows,
        Err(err) => return error("Failed to load KPI rows", err),
    };
    let settlements = match db.presuit_settlements(month) {
        Ok(rows) => rows,
        Err(err) => return error("Failed to load pre-suit settlements", err),
    };

    log::debug!(
        "Pre-suit dashboard ({}): {} KPI rows, {} settlements",
        month.unwrap_or("all months"),
        kpi_rows.len(),
        settlements.len()
    );

    let kpi_summaries = PEOPLE
        .iter()
        .map(|&person| summarize_kpis(person, &kpi_rows))
        .collect();

    PresuitResult::Success {
        data: PresuitDashboard {
            month_filter: month.map(str::to_string),
            month_options,
            kpi_summaries,
            people: dashboard::person_boxes(&settlements),
        },
    }
}

fn error(context: &str, err: crate::db::DbError) -> PresuitResult {
    log::error!("{}: {}", context, err);
    PresuitResult::Error {
        message: err.to_string(),
    }
}

/// Union of the two month lists, newest first.
fn merge_months(kpi_months: Vec<String>, settlement_months: Vec<String>) -> Vec<String> {
    let mut months: BTreeSet<String> = kpi_months.into_iter().collect();
    months.extend(settlement_months);
    months.into_iter().rev().collect()
}

/// Sum the counts and amounts, average the averages. No matching row at all
/// leaves every field None.
fn summarize_kpis(person: &str, rows: &[DbKpiRecord]) -> KpiSummary {
    let mine: Vec<&DbKpiRecord> = rows.iter().filter(|r| r.person_name == person).collect();
    if mine.is_empty() {
        return KpiSummary {
            person_name: person.to_string(),
            demands_sent: None,
            settlements_amount: None,
            avg_lien_resolution_days: None,
            files_without_14_day_contact: None,
            nps_score: None,
        };
    }

    let n = mine.len() as f64;
    KpiSummary {
        person_name: person.to_string(),
        demands_sent: Some(mine.iter().map(|r| r.demands_sent).sum()),
        settlements_amount: Some(mine.iter().map(|r| r.settlements_amount).sum()),
        avg_lien_resolution_days: Some(
            mine.iter().map(|r| r.avg_lien_resolution_days).sum::<f64>() / n,
        ),
        files_without_14_day_contact: Some(
            mine.iter().map(|r| r.files_without_14_day_contact).sum(),
        ),
        nps_score: Some(mine.iter().map(|r| r.nps_score).sum::<f64>() / n),
    }
}

// =============================================================================
// Tests
// =============================================================================
