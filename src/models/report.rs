//! Analysis report records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::biomarkers::BiomarkerSet;

/// A persisted semen-analysis report with its computed scores.
///
/// Scores are immutable once stored; a correction is a new report row,
/// never an UPDATE of an old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: Uuid,
    pub user_id: String,
    pub test_date: NaiveDate,
    pub source_file: String,
    /// SHA-256 of the uploaded document, hex-encoded. Used to reject
    /// duplicate uploads of the same file.
    pub file_hash: String,
    pub biomarkers: BiomarkerSet,
    /// Derived solely from biomarkers, 0–100.
    pub base_score: u8,
    /// Base score plus the bounded per-report lifestyle bonus, 0–100.
    pub adjusted_score: u8,
    pub created_at: String,
}

/// Everything needed to persist a new report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: String,
    pub test_date: NaiveDate,
    pub source_file: String,
    pub file_hash: String,
    pub biomarkers: BiomarkerSet,
    pub base_score: u8,
    pub adjusted_score: u8,
}
