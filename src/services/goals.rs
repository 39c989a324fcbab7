// Goals service
// Revenue-goal settings and Google-review counters backing the settings page
// and the firmwide dashboard header.

use serde::Serialize;

use crate::db::ReportsDb;
use crate::helpers::safe_f64;
use crate::roster::GOAL_YEARS;

/// Years selectable for a revenue goal.
pub fn goal_years() -> Vec<i32> {
    GOAL_YEARS.collect()
}

/// Annual revenue goal for `year`, falling back to the 2026 goal when no
/// year-specific value is stored. Malformed stored text coerces to 0.
pub fn revenue_goal(db: &ReportsDb, year: i32) -> Result<f64, String> {
    let fallback = db
        .get_setting("revenue_goal_2026", "0")
        .map_err(|e| e.to_string())?;
    let raw = db
        .get_setting(&format!("revenue_goal_{}", year), &fallback)
        .map_err(|e| e.to_string())?;
    Ok(safe_f64(&raw, 0.0))
}

pub fn set_revenue_goal(db: &ReportsDb, year: i32, amount: f64) -> Result<(), String> {
    if !GOAL_YEARS.contains(&year) {
        return Err(format!(
            "Goal year must be between {} and {}",
            GOAL_YEARS.start(),
            GOAL_YEARS.end()
        ));
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err("Revenue goal must be a non-negative amount".to_string());
    }
    db.set_setting(&format!("revenue_goal_{}", year), &amount.to_string())
        .map_err(|e| e.to_string())?;
    log::info!("Set revenue goal for {}: {}", year, amount);
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub baseline: i64,
    pub current: i64,
    pub gained: i64,
}

/// Google-review counters. `gained` is reviews accumulated since the baseline
/// was captured.
pub fn review_summary(db: &ReportsDb) -> Result<ReviewSummary, String> {
    let baseline = db
        .get_setting("google_reviews_baseline", "221")
        .map_err(|e| e.to_string())?;
    let current = db
        .get_setting("google_reviews_current", "221")
        .map_err(|e| e.to_string())?;
    let baseline = safe_f64(&baseline, 221.0) as i64;
    let current = safe_f64(&current, 221.0) as i64;
    Ok(ReviewSummary {
        baseline,
        current,
        gained: current - baseline,
    })
}

pub fn set_google_reviews(db: &ReportsDb, baseline: i64, current: i64) -> Result<(), String> {
    if baseline < 0 || current < 0 {
        return Err("Review counts cannot be negative".to_string());
    }
    db.set_setting("google_reviews_baseline", &baseline.to_string())
        .map_err(|e| e.to_string())?;
    db.set_setting("google_reviews_current", &current.to_string())
        .map_err(|e| e.to_string())?;
    log::info!(
        "Updated Google review counters: baseline {}, current {}",
        baseline,
        current
    );
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
