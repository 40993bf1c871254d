//! Lifestyle adjustments: two deliberately distinct bonus schemes.
//!
//! The per-report scheme runs once when a report is scored, using the
//! most recent rated log as context. The daily quick-check scheme runs
//! per daily log. They look similar but are separate features with
//! separate point tables; merging them would change observable scores
//! for existing data, so both are preserved as named operations.

use crate::models::enums::{DietQuality, SleepQuality, StressLevel};
use crate::models::{DailyChecklist, RatedHabits};

/// Per-report lifestyle bonus.
///
/// NOTE: the product doc states a 12-point maximum, but the enumerated
/// contributions below sum to 13 (3+2+3+2+1+2). The summed behavior is
/// what shipped and what historical scores reflect; keep it until
/// product confirms which number was intended.
pub fn report_lifestyle_bonus(ctx: &RatedHabits) -> u8 {
    let mut bonus: u8 = 0;

    bonus += match ctx.diet_quality {
        Some(DietQuality::Excellent) => 3,
        Some(DietQuality::Good) => 2,
        Some(DietQuality::Average) => 1,
        _ => 0,
    };

    bonus += match ctx.sleep_quality {
        Some(SleepQuality::Excellent) => 2,
        Some(SleepQuality::Good) => 1,
        _ => 0,
    };

    bonus += match ctx.exercise_minutes {
        Some(m) if m >= 60 => 3,
        Some(m) if m >= 30 => 2,
        Some(m) if m >= 10 => 1,
        _ => 0,
    };

    // Inverted: low stress earns the points.
    bonus += match ctx.stress_level {
        Some(StressLevel::Low) => 2,
        Some(StressLevel::Moderate) => 1,
        _ => 0,
    };

    if ctx.electrolytes {
        bonus += 1;
    }

    bonus += match ctx.masturbation_count {
        Some(0) => 2,
        Some(1) => 1,
        _ => 0,
    };

    bonus
}

/// Apply the per-report bonus to a base score, clamped at 100.
/// The bonus is non-negative, so no lower clamp is needed here.
pub fn apply_report_lifestyle_bonus(base_score: u8, ctx: &RatedHabits) -> u8 {
    (base_score as u32 + report_lifestyle_bonus(ctx) as u32).min(100) as u8
}

/// Daily quick-check points: six boolean habits, max 8.
pub fn daily_points(checklist: &DailyChecklist) -> u8 {
    let mut points: u8 = 0;
    if checklist.healthy_eating {
        points += 1;
    }
    if checklist.no_smoking {
        points += 2;
    }
    if checklist.no_alcohol {
        points += 1;
    }
    if checklist.exercised {
        points += 1;
    }
    if checklist.good_sleep {
        points += 2;
    }
    if checklist.loose_underwear {
        points += 1;
    }
    points
}

/// Apply daily points to whatever serves as that day's base, clamped
/// to [0, 100] on both ends.
pub fn apply_daily_points(base_score: u8, points: u8) -> u8 {
    (base_score as i32 + points as i32).clamp(0, 100) as u8
}
