//! Aggregated dashboard view: latest scores, streak and consistency.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::{
    count_reports, distinct_log_days, first_report_date, latest_report, log_dates,
};
use crate::models::StoredReport;
use crate::scoring::{compute_lifestyle_consistency, streak_ending_at};

#[derive(Serialize)]
pub struct DashboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_report: Option<StoredReport>,
    pub streak_days: u32,
    pub consistency_pct: u8,
    pub reports_total: u32,
    pub days_logged: u32,
}

pub async fn overview(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let today = Local::now().date_naive();

    let dates = log_dates(&conn, &user.user_id)?;
    let streak_days = streak_ending_at(&dates, today);

    let days_logged = distinct_log_days(&conn, &user.user_id)?;
    let tracked_days = match first_report_date(&conn, &user.user_id)? {
        Some(first) => (today - first).num_days().max(0) as u32,
        None => 0,
    };
    let consistency_pct = compute_lifestyle_consistency(days_logged, tracked_days);

    Ok(Json(DashboardResponse {
        latest_report: latest_report(&conn, &user.user_id)?,
        streak_days,
        consistency_pct,
        reports_total: count_reports(&conn, &user.user_id)?,
        days_logged,
    }))
}
