//! Descriptive metrics over daily-log history: trailing streak and
//! logging consistency. Used for the dashboard and the weekly summary
//! email, never for a persisted score.

use chrono::{Local, NaiveDate};

/// Count of consecutive calendar days, walking back from today, with at
/// least one log. Duplicate same-day entries are tolerated; any gap
/// ends the streak. A missing entry for today means a streak of 0.
pub fn compute_health_streak(log_dates: &[NaiveDate]) -> u32 {
    streak_ending_at(log_dates, Local::now().date_naive())
}

/// Streak walk with an explicit "today", so tests are date-stable.
pub fn streak_ending_at(log_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = log_dates.to_vec();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    let mut expected: i64 = 0;
    for date in dates {
        let offset = (today - date).num_days();
        if offset < 0 {
            // Future-dated entry, ignore.
            continue;
        }
        if offset == expected {
            expected += 1;
        } else if offset > expected {
            // Gap; the trailing streak ends here.
            break;
        }
        // offset < expected: duplicate of an already-counted day.
    }
    expected as u32
}

/// Percentage of tracked days that have a logged entry:
/// `min(100, round(100 × distinct_days / days_tracked))`.
/// Returns 0 when nothing has been tracked yet.
pub fn compute_lifestyle_consistency(distinct_days: u32, days_tracked: u32) -> u8 {
    if days_tracked == 0 {
        return 0;
    }
    let pct = (100.0 * distinct_days as f64 / days_tracked as f64).round() as u32;
    pct.min(100) as u8
}
