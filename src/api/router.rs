//! Route table and middleware stack.

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;

use super::endpoints::{dashboard, export, health, logs, recommendations, reports, summary};
use super::middleware::auth::require_auth;
use super::types::ApiContext;

/// Build the full application router. Everything under `/api` except
/// the health probe requires a bearer token.
pub fn build_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/reports", post(reports::upload).get(reports::list))
        .route(
            "/reports/:id",
            get(reports::detail).delete(reports::remove),
        )
        .route(
            "/reports/:id/recommendations",
            get(recommendations::list),
        )
        .route(
            "/reports/:id/recommendations/refresh",
            post(recommendations::refresh),
        )
        .route("/reports/:id/export.pdf", get(export::pdf))
        .route("/export/reports.csv", get(export::csv))
        .route("/logs", post(logs::create).get(logs::list))
        .route("/dashboard", get(dashboard::overview))
        .route("/summary/email", post(summary::send))
        .layer(from_fn(require_auth))
        .with_state(ctx.clone());

    let open = Router::new()
        .route("/health", get(health::check))
        .with_state(ctx.clone());

    Router::new()
        .nest("/api", open.merge(protected))
        .layer(Extension(ctx))
        .layer(CorsLayer::permissive())
}
