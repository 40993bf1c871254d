//! Identity-provider boundary: bearer token verification.
//!
//! Authentication is fully delegated: this service asks the provider
//! who a token belongs to and never sees credentials. Rejections map
//! to 401 in the API layer.

use std::collections::HashMap;

use serde::Deserialize;

use super::ServiceError;

/// The authenticated principal a token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub user_id: String,
    pub email: String,
}

/// Resolves a bearer token to a user, or rejects it.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedUser, ServiceError>;
}

/// Production verifier backed by the identity provider's userinfo
/// endpoint.
pub struct HttpTokenVerifier {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpTokenVerifier {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }
}

#[derive(Deserialize)]
struct UserInfoResponse {
    sub: String,
    email: String,
}

impl TokenVerifier for HttpTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedUser, ServiceError> {
        let url = format!("{}/userinfo", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(|e| ServiceError::from_reqwest(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ServiceError::Rejected("invalid or expired token".into()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let info: UserInfoResponse = response
            .json()
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;

        Ok(VerifiedUser {
            user_id: info.sub,
            email: info.email,
        })
    }
}

/// In-memory verifier for tests: a fixed token → user map.
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedUser>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    pub fn with_user(mut self, token: &str, user_id: &str, email: &str) -> Self {
        self.tokens.insert(
            token.to_string(),
            VerifiedUser {
                user_id: user_id.to_string(),
                email: email.to_string(),
            },
        );
        self
    }
}

impl Default for StaticTokenVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedUser, ServiceError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ServiceError::Rejected("unknown token".into()))
    }
}
