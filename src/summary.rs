//! Weekly summary: dashboard-style aggregation composed into an
//! email for the transactional-mail boundary.

use chrono::{Duration, Local, NaiveDate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::repository::{daily_log, report};
use crate::db::DatabaseError;
use crate::scoring::{compute_lifestyle_consistency, streak_ending_at};
use crate::services::mailer::OutboundEmail;

/// Aggregated week-in-review numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub streak_days: u32,
    pub consistency_pct: u8,
    pub logs_this_week: u32,
    pub latest_base_score: Option<u8>,
    pub latest_adjusted_score: Option<u8>,
}

/// Gathers the weekly summary for a user as of today.
pub fn gather_weekly_summary(
    conn: &Connection,
    user_id: &str,
) -> Result<WeeklySummary, DatabaseError> {
    gather_weekly_summary_at(conn, user_id, Local::now().date_naive())
}

/// Aggregation with an explicit "today", so tests are date-stable.
pub fn gather_weekly_summary_at(
    conn: &Connection,
    user_id: &str,
    today: NaiveDate,
) -> Result<WeeklySummary, DatabaseError> {
    let dates = daily_log::log_dates(conn, user_id)?;
    let streak_days = streak_ending_at(&dates, today);

    let distinct = daily_log::distinct_log_days(conn, user_id)?;
    let tracked = report::first_report_date(conn, user_id)?
        .map(|first| (today - first).num_days().max(0) as u32)
        .unwrap_or(0);
    let consistency_pct = compute_lifestyle_consistency(distinct, tracked);

    let logs_this_week = daily_log::count_logs_since(conn, user_id, today - Duration::days(6))?;

    let latest = report::latest_report(conn, user_id)?;

    Ok(WeeklySummary {
        streak_days,
        consistency_pct,
        logs_this_week,
        latest_base_score: latest.as_ref().map(|r| r.base_score),
        latest_adjusted_score: latest.as_ref().map(|r| r.adjusted_score),
    })
}

/// Composes the weekly summary email for a recipient.
pub fn compose_summary_email(recipient: &str, summary: &WeeklySummary) -> OutboundEmail {
    let mut body = String::from("Here's your week at a glance:\n\n");
    body.push_str(&format!("  Health streak: {} day(s)\n", summary.streak_days));
    body.push_str(&format!(
        "  Logging consistency: {}%\n",
        summary.consistency_pct
    ));
    body.push_str(&format!(
        "  Lifestyle logs this week: {}\n",
        summary.logs_this_week
    ));
    match (summary.latest_base_score, summary.latest_adjusted_score) {
        (Some(base), Some(adjusted)) => {
            body.push_str(&format!(
                "  Latest health score: {base}/100 (adjusted: {adjusted}/100)\n"
            ));
        }
        _ => body.push_str("  No analysis report yet. Upload one to get your score.\n"),
    }
    body.push_str("\nKeep the streak going!\n");

    OutboundEmail {
        to: recipient.to_string(),
        subject: format!(
            "Your weekly fertility summary: {} day streak",
            summary.streak_days
        ),
        body_text: body,
    }
}
