//! Weekly summary email endpoint.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::summary::{compose_summary_email, gather_weekly_summary, WeeklySummary};

#[derive(Serialize)]
pub struct SummaryEmailResponse {
    pub sent_to: String,
    pub summary: WeeklySummary,
}

pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<SummaryEmailResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let summary = gather_weekly_summary(&conn, &user.user_id)?;
    let email = compose_summary_email(&user.email, &summary);

    let mailer = ctx.mailer.clone();
    tokio::task::spawn_blocking(move || mailer.send(&email))
        .await?
        .map_err(|err| ApiError::upstream("mail", err))?;

    tracing::info!(user_id = %user.user_id, "weekly summary sent");
    Ok(Json(SummaryEmailResponse {
        sent_to: user.email,
        summary,
    }))
}
