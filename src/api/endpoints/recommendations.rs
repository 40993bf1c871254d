//! Recommendation listing and regeneration for a stored report.

use axum::extract::{Path, State};
use axum::Extension;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::{get_report, latest_snapshot, list_for_report, replace_for_report};
use crate::models::Recommendation;
use crate::scoring::build_recommendation_request;

#[derive(Serialize)]
pub struct RecommendationListResponse {
    pub recommendations: Vec<Recommendation>,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<RecommendationListResponse>, ApiError> {
    let conn = ctx.open_db()?;
    // 404 for unknown or foreign reports, never an empty list.
    get_report(&conn, &user.user_id, &report_id.to_string())?;
    let recommendations = list_for_report(&conn, &user.user_id, &report_id)?;
    Ok(Json(RecommendationListResponse { recommendations }))
}

/// Re-run the reasoning service against the stored biomarkers and the
/// most recent lifestyle snapshot, replacing earlier advice. Unlike
/// upload, a reasoning failure here is a hard error.
pub async fn refresh(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<RecommendationListResponse>, ApiError> {
    let mut conn = ctx.open_db()?;
    let report = get_report(&conn, &user.user_id, &report_id.to_string())?;
    let snapshot = latest_snapshot(&conn, &user.user_id)?;

    let request =
        build_recommendation_request(&report.biomarkers, report.base_score, snapshot.as_ref());
    let reasoner = ctx.reasoner.clone();
    let drafts = tokio::task::spawn_blocking(move || reasoner.recommend(&request))
        .await?
        .map_err(|err| ApiError::upstream("reasoning", err))?;

    let recommendations = replace_for_report(&mut conn, &user.user_id, &report_id, &drafts)?;
    tracing::info!(
        user_id = %user.user_id,
        report_id = %report_id,
        count = recommendations.len(),
        "recommendations regenerated"
    );
    Ok(Json(RecommendationListResponse { recommendations }))
}
