//! Report upload, listing, detail and deletion.
//!
//! Upload runs the full pipeline: decode the document, reject
//! duplicates by content hash, extract biomarkers, score, persist, and
//! (best effort) generate recommendations.

use axum::extract::{Path, State};
use axum::Extension;
use axum::Json;
use base64::Engine;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::{
    delete_report, find_by_hash, get_report, insert_report, latest_rated_habits, latest_snapshot,
    list_for_report, list_reports, replace_for_report,
};
use crate::models::{NewReport, Recommendation, StoredReport};
use crate::scoring::{
    apply_report_lifestyle_bonus, build_recommendation_request, compute_base_score,
};

/// Uploads larger than this are rejected before any decoding work.
const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Base64 inflates by 4/3, plus slack for the data URL header, so the
/// encoded string bounds the decoded size and oversized uploads can be
/// rejected without decoding them.
const MAX_ENCODED_LEN: usize = MAX_DOCUMENT_BYTES / 3 * 4 + 256;

#[derive(Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    /// Lab report document as a base64 data URL
    /// (`data:application/pdf;base64,...`).
    pub data: String,
    /// Date the sample was collected. Defaults to today.
    pub test_date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<StoredReport>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<StoredReport>,
}

#[derive(Serialize)]
pub struct ReportDetailResponse {
    pub report: StoredReport,
    pub recommendations: Vec<Recommendation>,
}

pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(payload): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    if payload.file_name.trim().is_empty() {
        return Err(ApiError::BadRequest("file_name must not be empty".into()));
    }
    let (content_type, bytes) = decode_data_url(&payload.data)?;
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(ApiError::BadRequest(format!(
            "document exceeds the {} byte limit",
            MAX_DOCUMENT_BYTES
        )));
    }
    let test_date = payload
        .test_date
        .unwrap_or_else(|| Local::now().date_naive());

    let file_hash = hex_sha256(&bytes);
    let mut conn = ctx.open_db()?;
    if find_by_hash(&conn, &user.user_id, &file_hash)?.is_some() {
        return Err(ApiError::Conflict(
            "this document was already uploaded".into(),
        ));
    }

    let extractor = ctx.extractor.clone();
    let biomarkers = tokio::task::spawn_blocking(move || extractor.extract(&bytes, &content_type))
        .await?
        .map_err(|err| ApiError::upstream("extraction", err))?;

    if biomarkers.is_empty() {
        tracing::info!(
            user_id = %user.user_id,
            file = %payload.file_name,
            "no biomarkers recognized in document, nothing persisted"
        );
        return Ok(Json(UploadResponse {
            status: "no_usable_data",
            report: None,
            recommendations: Vec::new(),
        }));
    }

    let base_score = compute_base_score(&biomarkers);
    let adjusted_score = match latest_rated_habits(&conn, &user.user_id)? {
        Some(habits) => apply_report_lifestyle_bonus(base_score, &habits),
        None => base_score,
    };

    let report_id = insert_report(
        &conn,
        &NewReport {
            user_id: user.user_id.clone(),
            test_date,
            source_file: payload.file_name.clone(),
            file_hash,
            biomarkers: biomarkers.clone(),
            base_score,
            adjusted_score,
        },
    )?;
    let report = get_report(&conn, &user.user_id, &report_id.to_string())?;
    tracing::info!(
        user_id = %user.user_id,
        report_id = %report_id,
        base_score,
        adjusted_score,
        "report scored and stored"
    );

    // Recommendations are best effort: a reasoning outage must not
    // lose an already-scored report.
    let snapshot = latest_snapshot(&conn, &user.user_id)?;
    let request = build_recommendation_request(&biomarkers, base_score, snapshot.as_ref());
    let reasoner = ctx.reasoner.clone();
    let recommendations =
        match tokio::task::spawn_blocking(move || reasoner.recommend(&request)).await? {
            Ok(drafts) => replace_for_report(&mut conn, &user.user_id, &report_id, &drafts)?,
            Err(err) => {
                tracing::warn!(
                    report_id = %report_id,
                    error = %err,
                    "recommendation generation failed, report kept without advice"
                );
                Vec::new()
            }
        };

    Ok(Json(UploadResponse {
        status: "scored",
        report: Some(report),
        recommendations,
    }))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let reports = list_reports(&conn, &user.user_id)?;
    Ok(Json(ReportListResponse { reports }))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportDetailResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let report = get_report(&conn, &user.user_id, &id.to_string())?;
    let recommendations = list_for_report(&conn, &user.user_id, &id)?;
    Ok(Json(ReportDetailResponse {
        report,
        recommendations,
    }))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.open_db()?;
    delete_report(&conn, &user.user_id, &id.to_string())?;
    tracing::info!(user_id = %user.user_id, report_id = %id, "report deleted");
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Split a `data:<media-type>;base64,<payload>` URL into its content
/// type and decoded bytes.
fn decode_data_url(data: &str) -> Result<(String, Vec<u8>), ApiError> {
    if data.len() > MAX_ENCODED_LEN {
        return Err(ApiError::BadRequest(format!(
            "document exceeds the {} byte limit",
            MAX_DOCUMENT_BYTES
        )));
    }
    let rest = data
        .strip_prefix("data:")
        .ok_or_else(|| ApiError::BadRequest("data must be a base64 data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ApiError::BadRequest("malformed data URL".into()))?;
    let content_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| ApiError::BadRequest("data URL must be base64 encoded".into()))?;
    if content_type.is_empty() {
        return Err(ApiError::BadRequest("data URL missing media type".into()));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|err| ApiError::BadRequest(format!("invalid base64 payload: {err}")))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("document is empty".into()));
    }
    Ok((content_type.to_string(), bytes))
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
