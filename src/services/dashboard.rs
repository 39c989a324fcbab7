// Dashboard service
// Firmwide aggregation over the settlement ledger for a resolved period:
// headline totals, track split, goal progress, and per-person boxes.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::db::{DbSettlement, ReportsDb};
use crate::period::{DateRange, ReportPeriod};
use crate::roster::{Track, PEOPLE};
use crate::services::goals::{self, ReviewSummary};

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSplit {
    pub pre_pct: f64,
    pub lit_pct: f64,
    pub unknown_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBox {
    pub person_name: String,
    pub cases: usize,
    pub settlement_total: f64,
    pub fee_total: f64,
    pub latest_date: Option<String>,
    pub transactions: Vec<DbSettlement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwideDashboard {
    pub period_label: String,
    pub range: DateRange,
    pub num_cases: usize,
    pub total_settlement: f64,
    pub total_fees: f64,
    pub avg_settlement: f64,
    pub avg_fee: f64,
    pub split: TrackSplit,
    pub revenue_goal: f64,
    pub goal_progress: f64,
    pub reviews: ReviewSummary,
    pub people: Vec<PersonBox>,
}

#[derive(Debug, Serialize)]
#[allow(clippy::large_enum_variant)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FirmwideResult {
    Success { data: FirmwideDashboard },
    Error { message: String },
}

pub fn firmwide_dashboard(db: &ReportsDb, period: &ReportPeriod) -> FirmwideResult {
    firmwide_dashboard_at(db, period, chrono::Local::now().date_naive())
}

/// Deterministic entry point. `today` only matters for YTD resolution.
pub fn firmwide_dashboard_at(
    db: &ReportsDb,
    period: &ReportPeriod,
    today: NaiveDate,
) -> FirmwideResult {
    let range = period.resolve(today);

    let rows = match db.settlements_in_range(range.start, range.end, None) {
        Ok(rows) => rows,
        Err(err) => {
            log::error!("Failed to load settlements for dashboard: {}", err);
            return FirmwideResult::Error {
                message: err.to_string(),
            };
        }
    };

    let revenue_goal = match goals::revenue_goal(db, goal_year(period)) {
        Ok(goal) => goal,
        Err(message) => return FirmwideResult::Error { message },
    };
    let reviews = match goals::review_summary(db) {
        Ok(reviews) => reviews,
        Err(message) => return FirmwideResult::Error { message },
    };

    log::debug!(
        "Firmwide dashboard {}: {} settlements in {}..{}",
        period.label(),
        rows.len(),
        range.start,
        range.end
    );

    FirmwideResult::Success {
        data: build_dashboard(period.label(), range, rows, revenue_goal, reviews),
    }
}

/// Year whose revenue goal applies to the period. Custom ranges use the year
/// the range starts in.
fn goal_year(period: &ReportPeriod) -> i32 {
    match period {
        ReportPeriod::Ytd { year } => *year,
        ReportPeriod::Monthly { year, .. } => *year,
        ReportPeriod::Custom { start, .. } => start.year(),
    }
}

fn build_dashboard(
    period_label: String,
    range: DateRange,
    rows: Vec<DbSettlement>,
    revenue_goal: f64,
    reviews: ReviewSummary,
) -> FirmwideDashboard {
    let num_cases = rows.len();
    let total_settlement: f64 = rows.iter().map(|r| r.settlement_amount).sum();
    let total_fees: f64 = rows.iter().map(|r| r.fee_earned).sum();
    let (avg_settlement, avg_fee) = if num_cases == 0 {
        (0.0, 0.0)
    } else {
        (
            total_settlement / num_cases as f64,
            total_fees / num_cases as f64,
        )
    };
    let split = track_split(&rows);
    let goal_progress = if revenue_goal == 0.0 {
        0.0
    } else {
        total_fees / revenue_goal * 100.0
    };
    let people = person_boxes(&rows);

    FirmwideDashboard {
        period_label,
        range,
        num_cases,
        total_settlement,
        total_fees,
        avg_settlement,
        avg_fee,
        split,
        revenue_goal,
        goal_progress,
        reviews,
        people,
    }
}

/// Fee share by track. With no fees at all, the whole split is unknown.
/// `unknown_pct` is clamped so rounding never renders a negative slice.
fn track_split(rows: &[DbSettlement]) -> TrackSplit {
    let total_fees: f64 = rows.iter().map(|r| r.fee_earned).sum();
    let (pre_pct, lit_pct) = if total_fees == 0.0 {
        (0.0, 0.0)
    } else {
        let fee_share = |track: Track| -> f64 {
            let fees: f64 = rows
                .iter()
                .filter(|r| r.track == track)
                .map(|r| r.fee_earned)
                .sum();
            fees / total_fees * 100.0
        };
        (fee_share(Track::PreSuit), fee_share(Track::Litigation))
    };
    let unknown_pct = (100.0 - pre_pct - lit_pct).max(0.0);
    TrackSplit {
        pre_pct,
        lit_pct,
        unknown_pct,
    }
}

/// One box per roster person, in roster order, including people with no
/// settlements in the given rows.
pub(crate) fn person_boxes(rows: &[DbSettlement]) -> Vec<PersonBox> {
    PEOPLE
        .iter()
        .map(|&person| {
            let transactions: Vec<DbSettlement> = rows
                .iter()
                .filter(|r| r.person_name == person)
                .cloned()
                .collect();
            let settlement_total: f64 = transactions.iter().map(|r| r.settlement_amount).sum();
            let fee_total: f64 = transactions.iter().map(|r| r.fee_earned).sum();
            // ISO dates compare lexicographically, so max() is the latest.
            let latest_date = transactions
                .iter()
                .map(|r| r.settlement_date.clone())
                .max();
            PersonBox {
                person_name: person.to_string(),
                cases: transactions.len(),
                settlement_total,
                fee_total,
                latest_date,
                transactions,
            }
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
