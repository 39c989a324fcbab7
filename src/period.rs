//! Reporting period selection and resolution.
//!
//! Dashboards are always scoped to an inclusive date range. Three views exist:
//! year-to-date, a single calendar month, and a caller-supplied custom range.
//! Resolution takes `today` as an argument so tests can pin the clock.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::roster::month_label;

/// An inclusive `[start, end]` date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A dashboard time window as selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ReportPeriod {
    /// Jan 1 of `year` through today (current year) or Dec 31 (any other year).
    Ytd { year: i32 },
    /// First through last calendar day of the month, leap-year aware.
    Monthly { year: i32, month: u32 },
    /// Caller-supplied bounds. Deliberately not validated: an inverted range
    /// simply matches no rows.
    Custom { start: NaiveDate, end: NaiveDate },
}

fn date_or_epoch(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    date_or_epoch(next_year, next_month, 1)
        .pred_opt()
        .unwrap_or_default()
}

impl ReportPeriod {
    /// Resolve to a concrete inclusive range. Out-of-range month numbers are
    /// clamped to 1..=12; selectors only produce valid months.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match *self {
            ReportPeriod::Ytd { year } => {
                let start = date_or_epoch(year, 1, 1);
                let end = if year == today.year() {
                    today
                } else {
                    date_or_epoch(year, 12, 31)
                };
                DateRange { start, end }
            }
            ReportPeriod::Monthly { year, month } => {
                let month = month.clamp(1, 12);
                DateRange {
                    start: date_or_epoch(year, month, 1),
                    end: last_day_of_month(year, month),
                }
            }
            ReportPeriod::Custom { start, end } => DateRange { start, end },
        }
    }

    /// Heading label the way the dashboard titles it: "YTD 2026", "Mar-26",
    /// "Custom".
    pub fn label(&self) -> String {
        match *self {
            ReportPeriod::Ytd { year } => format!("YTD {}", year),
            ReportPeriod::Monthly { year, month } => {
                format!("{}-{:02}", month_label(month.clamp(1, 12)), year.rem_euclid(100))
            }
            ReportPeriod::Custom { .. } => "Custom".to_string(),
        }
    }
}
