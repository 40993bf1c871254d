//! CSV and PDF export endpoints.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Extension;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::{get_report, list_for_report, list_reports};
use crate::export::{generate_report_pdf, reports_csv};

pub async fn csv(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let reports = list_reports(&conn, &user.user_id)?;
    let body = reports_csv(&reports);
    attachment_response("text/csv; charset=utf-8", "fertilog-reports.csv", body.into_bytes())
}

pub async fn pdf(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(report_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let report = get_report(&conn, &user.user_id, &report_id.to_string())?;
    let recommendations = list_for_report(&conn, &user.user_id, &report_id)?;
    let bytes = generate_report_pdf(&report, &recommendations)
        .map_err(|err| ApiError::Internal(format!("PDF generation failed: {err}")))?;
    let filename = format!("fertilog-report-{}.pdf", report.test_date.format("%Y-%m-%d"));
    attachment_response("application/pdf", &filename, bytes)
}

fn attachment_response(
    content_type: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(bytes))
        .map_err(|err| ApiError::Internal(format!("response build failed: {err}")))
}
