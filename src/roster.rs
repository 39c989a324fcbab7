//! Fixed configuration shared between entry forms and dashboards.
//!
//! The staff roster, month labels, and goal-year options are deliberate
//! constants rather than database rows: the firm is five people, and every
//! view iterates the same list in the same order. Validation against the
//! roster happens here so no other module hard-codes a name.

use serde::{Deserialize, Serialize};

/// Case managers / paralegals who own settlements and KPI rows, in display order.
pub const PEOPLE: [&str; 5] = ["Jackelin", "Emma", "Alejandra", "David", "Caroline"];

/// Month numbers with their short labels, for period selectors.
pub const MONTHS: [(u32, &str); 12] = [
    (1, "Jan"),
    (2, "Feb"),
    (3, "Mar"),
    (4, "Apr"),
    (5, "May"),
    (6, "Jun"),
    (7, "Jul"),
    (8, "Aug"),
    (9, "Sep"),
    (10, "Oct"),
    (11, "Nov"),
    (12, "Dec"),
];

/// Years a revenue goal can be stored for.
pub const GOAL_YEARS: std::ops::RangeInclusive<i32> = 2024..=2030;

/// Year whose revenue goal acts as the fallback when no year-specific goal is set.
pub const DEFAULT_GOAL_YEAR: i32 = 2026;

/// Whether a name belongs to the fixed staff roster.
pub fn is_roster_person(name: &str) -> bool {
    PEOPLE.contains(&name)
}

/// Short label for a month number, e.g. 3 -> "Mar".
pub fn month_label(month: u32) -> &'static str {
    MONTHS
        .iter()
        .find(|(num, _)| *num == month)
        .map(|(_, label)| *label)
        .unwrap_or("???")
}

/// Which phase a settled case was in, used for the revenue-split report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    PreSuit,
    Litigation,
    Unknown,
}

impl Track {
    /// String label for SQL storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::PreSuit => "pre_suit",
            Track::Litigation => "litigation",
            Track::Unknown => "unknown",
        }
    }

    /// Parse from SQL string. Anything unrecognized lands in `Unknown`,
    /// matching the column default.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "pre_suit" => Track::PreSuit,
            "litigation" => Track::Litigation,
            _ => Track::Unknown,
        }
    }

    /// Human label for dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            Track::PreSuit => "Pre-Suit",
            Track::Litigation => "Litigation",
            Track::Unknown => "Unknown",
        }
    }
}

impl Default for Track {
    fn default() -> Self {
        Track::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_membership() {
        assert!(is_roster_person("Emma"));
        assert!(is_roster_person("Jackelin"));
        assert!(!is_roster_person("emma"), "roster check is case-sensitive");
        assert!(!is_roster_person("Nobody"));
    }

    #[test]
    fn test_track_round_trip() {
        for track in [Track::PreSuit, Track::Litigation, Track::Unknown] {
            assert_eq!(Track::from_str_lossy(track.as_str()), track);
        }
        assert_eq!(Track::from_str_lossy("garbage"), Track::Unknown);
    }

    #[test]
    fn test_track_serde_labels() {
        let json = serde_json::to_string(&Track::PreSuit).expect("serialize");
        assert_eq!(json, "\"pre_suit\"");
        let back: Track = serde_json::from_str("\"litigation\"").expect("deserialize");
        assert_eq!(back, Track::Litigation);
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(MONTHS.len(), 12);
    }

    #[test]
    fn test_goal_years() {
        assert!(GOAL_YEARS.contains(&DEFAULT_GOAL_YEAR));
        assert_eq!(GOAL_YEARS.clone().count(), 7);
    }
}
