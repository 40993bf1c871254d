//! Bearer-token authentication middleware.
//!
//! Every protected route passes through here: the token is verified
//! against the identity provider and the resulting [`UserContext`] is
//! injected into request extensions for handlers to consume.

use axum::extract::Request;
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};

pub async fn require_auth(
    Extension(ctx): Extension<ApiContext>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or(ApiError::Unauthorized)?;

    let verifier = ctx.verifier.clone();
    let verified = tokio::task::spawn_blocking(move || verifier.verify(&token))
        .await?
        .map_err(|err| ApiError::upstream("identity", err))?;

    request.extensions_mut().insert(UserContext {
        user_id: verified.user_id,
        email: verified.email,
    });

    let mut response = next.run(request).await;
    // Responses on authenticated routes carry health data.
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

fn bearer_token(request: &Request) -> Option<String> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
