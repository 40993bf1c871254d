//! Health scoring & recommendation deriver.
//!
//! Pure, synchronous, deterministic functions: biomarkers → base score,
//! lifestyle context → bounded bonus, daily checklist → points, log
//! history → streak/consistency, and the reasoning-service payload
//! builder. No I/O anywhere in this module.

pub mod base;
pub mod lifestyle;
pub mod prompt;
pub mod streak;

pub use base::compute_base_score;
pub use lifestyle::{
    apply_daily_points, apply_report_lifestyle_bonus, daily_points, report_lifestyle_bonus,
};
pub use prompt::{build_recommendation_request, RecommendationRequest};
pub use streak::{compute_health_streak, compute_lifestyle_consistency, streak_ending_at};
