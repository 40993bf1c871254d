//! Daily lifestyle log creation and listing.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::{insert_daily_log, latest_report, list_daily_logs};
use crate::models::{LifestyleSnapshot, StoredDailyLog};
use crate::scoring::{
    apply_daily_points, apply_report_lifestyle_bonus, daily_points, report_lifestyle_bonus,
};

#[derive(Deserialize)]
pub struct CreateLogRequest {
    /// Day being logged. Defaults to today.
    pub log_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub snapshot: LifestyleSnapshot,
}

#[derive(Serialize)]
pub struct CreateLogResponse {
    pub log: StoredDailyLog,
    /// Latest base score adjusted for this day's habits, when a report
    /// exists to adjust.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_score: Option<u8>,
}

#[derive(Serialize)]
pub struct LogListResponse {
    pub logs: Vec<StoredDailyLog>,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(payload): Json<CreateLogRequest>,
) -> Result<Json<CreateLogResponse>, ApiError> {
    let log_date = payload
        .log_date
        .unwrap_or_else(|| Local::now().date_naive());
    if log_date > Local::now().date_naive() {
        return Err(ApiError::BadRequest("log_date must not be in the future".into()));
    }

    let points = match &payload.snapshot {
        LifestyleSnapshot::Checklist(checklist) => daily_points(checklist),
        LifestyleSnapshot::Rated(habits) => report_lifestyle_bonus(habits),
    };

    let conn = ctx.open_db()?;
    let log_id = insert_daily_log(&conn, &user.user_id, log_date, &payload.snapshot, points)?;

    let day_score = latest_report(&conn, &user.user_id)?.map(|report| match &payload.snapshot {
        LifestyleSnapshot::Checklist(_) => apply_daily_points(report.base_score, points),
        LifestyleSnapshot::Rated(habits) => {
            apply_report_lifestyle_bonus(report.base_score, habits)
        }
    });

    tracing::info!(
        user_id = %user.user_id,
        %log_date,
        shape = payload.snapshot.shape_str(),
        points,
        "daily log recorded"
    );

    let logs = list_daily_logs(&conn, &user.user_id)?;
    let log = logs
        .into_iter()
        .find(|entry| entry.id == log_id)
        .ok_or_else(|| ApiError::Internal("stored log vanished after insert".into()))?;

    Ok(Json(CreateLogResponse { log, day_score }))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<LogListResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let logs = list_daily_logs(&conn, &user.user_id)?;
    Ok(Json(LogListResponse { logs }))
}
