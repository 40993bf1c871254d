//! Daily lifestyle log shapes.
//!
//! Two historical shapes exist in user data: a richer enumerated form
//! (`Rated`) and a legacy boolean checklist (`Checklist`). Both are
//! accepted at the API boundary and normalized into the tagged
//! `LifestyleSnapshot` sum type once, at ingestion; consumers never
//! sniff fields to guess which shape they were handed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::{DietQuality, SleepQuality, StressLevel};

/// Enumerated lifestyle ratings plus optional numeric habits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatedHabits {
    pub diet_quality: Option<DietQuality>,
    pub sleep_quality: Option<SleepQuality>,
    pub stress_level: Option<StressLevel>,
    pub exercise_minutes: Option<u32>,
    pub electrolytes: bool,
    pub masturbation_count: Option<u32>,
}

/// Legacy six-item boolean checklist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyChecklist {
    pub healthy_eating: bool,
    pub no_smoking: bool,
    pub no_alcohol: bool,
    pub exercised: bool,
    /// 7+ hours of sleep.
    pub good_sleep: bool,
    pub loose_underwear: bool,
}

/// Canonical internal representation of one day's lifestyle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum LifestyleSnapshot {
    Rated(RatedHabits),
    Checklist(DailyChecklist),
}

impl LifestyleSnapshot {
    pub fn shape_str(&self) -> &'static str {
        match self {
            Self::Rated(_) => "rated",
            Self::Checklist(_) => "checklist",
        }
    }
}

/// A persisted daily log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDailyLog {
    pub id: Uuid,
    pub user_id: String,
    pub log_date: NaiveDate,
    pub snapshot: LifestyleSnapshot,
    /// Points earned by this day's habits (0–8 for the checklist shape).
    pub daily_points: u8,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tag_selects_variant() {
        let json = r#"{"shape": "checklist", "no_smoking": true, "good_sleep": true}"#;
        let snapshot: LifestyleSnapshot = serde_json::from_str(json).unwrap();
        match snapshot {
            LifestyleSnapshot::Checklist(c) => {
                assert!(c.no_smoking);
                assert!(c.good_sleep);
                assert!(!c.exercised);
            }
            LifestyleSnapshot::Rated(_) => panic!("expected checklist variant"),
        }
    }

    #[test]
    fn rated_shape_accepts_partial_fields() {
        let json = r#"{"shape": "rated", "diet_quality": "good", "electrolytes": true}"#;
        let snapshot: LifestyleSnapshot = serde_json::from_str(json).unwrap();
        match snapshot {
            LifestyleSnapshot::Rated(r) => {
                assert_eq!(r.diet_quality, Some(DietQuality::Good));
                assert!(r.electrolytes);
                assert!(r.stress_level.is_none());
            }
            LifestyleSnapshot::Checklist(_) => panic!("expected rated variant"),
        }
    }

    #[test]
    fn unknown_shape_rejected() {
        let json = r#"{"shape": "freeform", "notes": "slept well"}"#;
        assert!(serde_json::from_str::<LifestyleSnapshot>(json).is_err());
    }
}
