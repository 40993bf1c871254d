//! Recommendation records returned by the reasoning service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::{RecommendationCategory, RecommendationPriority};

/// One recommendation as produced by the reasoning service, before it
/// has an identity or a rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDraft {
    pub title: String,
    pub description: String,
    pub category: RecommendationCategory,
    pub priority: RecommendationPriority,
    pub reasoning: String,
}

/// A persisted, ranked recommendation attached to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: String,
    pub report_id: Option<Uuid>,
    /// 1-based position in the ranked list.
    pub rank: u32,
    pub title: String,
    pub description: String,
    pub category: RecommendationCategory,
    pub priority: RecommendationPriority,
    pub reasoning: String,
    pub created_at: String,
}
