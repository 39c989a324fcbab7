//! Shared type definitions for the database layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::Track;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

impl DbError {
    /// True when the record was rejected before any statement ran. These are
    /// user-facing form errors, never storage failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Validation(_))
    }
}

/// A row from the `settlements` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbSettlement {
    pub id: i64,
    pub person_name: String,
    pub client_name: String,
    pub settlement_amount: f64,
    pub policy_limits: f64,
    pub fee_earned: f64,
    /// Stored as `YYYY-MM-DD`; lexicographic order is chronological.
    pub settlement_date: String,
    pub tod: Option<String>,
    pub track: Track,
    pub created_at: String,
}

/// Input for a new settlement row. Validated before any SQL runs; id and
/// created_at are assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSettlement {
    pub person_name: String,
    pub client_name: String,
    pub settlement_amount: f64,
    pub policy_limits: f64,
    pub fee_earned: f64,
    pub settlement_date: NaiveDate,
    pub tod: Option<String>,
    pub track: Track,
}

/// A row from the `pre_suit_kpis` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbKpiRecord {
    pub id: i64,
    pub person_name: String,
    /// `YYYY-MM`; unique together with `person_name`.
    pub month: String,
    pub demands_sent: i64,
    pub settlements_amount: f64,
    pub avg_lien_resolution_days: f64,
    pub files_without_14_day_contact: i64,
    pub nps_score: f64,
    pub created_at: String,
}

/// The five metric fields a KPI save replaces together. There is no partial
/// update: a later save for the same (person, month) overwrites all of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    pub demands_sent: i64,
    pub settlements_amount: f64,
    pub avg_lien_resolution_days: f64,
    pub files_without_14_day_contact: i64,
    pub nps_score: f64,
}
