//! API error type mapped onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::services::ServiceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream service '{service}' failed: {detail}")]
    Upstream {
        service: &'static str,
        detail: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::Upstream { .. } => "upstream_failure",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Wrap a collaborator failure, logging the detail. Auth rejections
    /// stay a 401; everything else surfaces as a 502.
    pub fn upstream(service: &'static str, err: ServiceError) -> Self {
        match err {
            ServiceError::Rejected(reason) => {
                tracing::warn!(service, %reason, "upstream rejected request");
                ApiError::Unauthorized
            }
            other => {
                tracing::warn!(service, error = %other, "upstream service failed");
                ApiError::Upstream {
                    service,
                    detail: other.to_string(),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id}"))
            }
            DatabaseError::ConstraintViolation(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Tokio join failures only happen when a blocking task panics.
impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_maps_to_404_with_json_body() {
        let response = ApiError::NotFound("report abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not_found");
        assert!(json["message"].as_str().unwrap().contains("report abc"));
    }

    #[tokio::test]
    async fn upstream_maps_to_502() {
        let err = ApiError::upstream(
            "extraction",
            ServiceError::Timeout(30),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"], "upstream_failure");
    }

    #[tokio::test]
    async fn upstream_rejection_maps_to_401() {
        let err = ApiError::upstream("identity", ServiceError::Rejected("bad token".into()));
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn database_not_found_converts_to_api_not_found() {
        let db_err = DatabaseError::NotFound {
            entity_type: "report".into(),
            id: "xyz".into(),
        };
        let api_err: ApiError = db_err.into();
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }
}
