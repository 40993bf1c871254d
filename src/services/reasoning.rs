//! Recommendation reasoning boundary.
//!
//! Takes the normalized `RecommendationRequest` built by the scoring
//! core, sends it to the hosted reasoning service, and parses the
//! ranked recommendation list. Category and priority values outside
//! the allowed vocabularies are rejected at parse time rather than
//! stored as free text.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ServiceError;
use crate::models::enums::{RecommendationCategory, RecommendationPriority};
use crate::models::RecommendationDraft;
use crate::scoring::prompt::RECOMMENDATION_SYSTEM_PROMPT;
use crate::scoring::RecommendationRequest;

/// The service must return 3–6 recommendations; anything past 6 is
/// dropped rather than surfaced.
const MAX_RECOMMENDATIONS: usize = 6;

/// Produces ranked recommendations for a scored report.
pub trait RecommendationEngine: Send + Sync {
    fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationDraft>, ServiceError>;
}

/// Production engine backed by the hosted reasoning API.
pub struct HttpReasoner {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpReasoner {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }
}

#[derive(Serialize)]
struct ReasonRequest<'a> {
    system: &'a str,
    prompt: String,
}

#[derive(Deserialize)]
struct ReasonResponse {
    recommendations: Vec<RawRecommendation>,
}

/// Wire form before vocabulary validation.
#[derive(Deserialize)]
struct RawRecommendation {
    title: String,
    description: String,
    category: String,
    priority: String,
    reasoning: String,
}

impl RecommendationEngine for HttpReasoner {
    fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationDraft>, ServiceError> {
        let start = std::time::Instant::now();
        let url = format!("{}/v1/recommendations", self.base_url);
        let body = ReasonRequest {
            system: RECOMMENDATION_SYSTEM_PROMPT,
            prompt: request.to_prompt(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ServiceError::from_reqwest(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ReasonResponse = response
            .json()
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;

        let drafts = validate_drafts(parsed.recommendations)?;

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            count = drafts.len(),
            "Recommendation reasoning complete"
        );

        Ok(drafts)
    }
}

fn validate_drafts(raw: Vec<RawRecommendation>) -> Result<Vec<RecommendationDraft>, ServiceError> {
    if raw.is_empty() {
        return Err(ServiceError::ResponseParsing(
            "reasoning service returned no recommendations".into(),
        ));
    }

    raw.into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|r| {
            Ok(RecommendationDraft {
                category: RecommendationCategory::from_str(&r.category).map_err(|_| {
                    ServiceError::ResponseParsing(format!("unknown category: {}", r.category))
                })?,
                priority: RecommendationPriority::from_str(&r.priority).map_err(|_| {
                    ServiceError::ResponseParsing(format!("unknown priority: {}", r.priority))
                })?,
                title: r.title,
                description: r.description,
                reasoning: r.reasoning,
            })
        })
        .collect()
}

/// Mock engine for tests. Returns a configured list of drafts.
pub struct MockReasoner {
    drafts: Vec<RecommendationDraft>,
}

impl MockReasoner {
    pub fn returning(drafts: Vec<RecommendationDraft>) -> Self {
        Self { drafts }
    }

    /// A plausible three-item canned response.
    pub fn canned() -> Self {
        let draft = |title: &str, category, priority| RecommendationDraft {
            title: title.into(),
            description: format!("{title}: details."),
            category,
            priority,
            reasoning: "Derived from the reported values.".into(),
        };
        Self::returning(vec![
            draft(
                "Add zinc and folate",
                RecommendationCategory::Supplements,
                RecommendationPriority::High,
            ),
            draft(
                "Train 4x per week",
                RecommendationCategory::Exercise,
                RecommendationPriority::Medium,
            ),
            draft(
                "Prioritize 8h sleep",
                RecommendationCategory::Sleep,
                RecommendationPriority::Medium,
            ),
        ])
    }
}

impl RecommendationEngine for MockReasoner {
    fn recommend(
        &self,
        _request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationDraft>, ServiceError> {
        Ok(self.drafts.clone())
    }
}

/// Mock engine that always fails.
pub struct FailingReasoner;

impl RecommendationEngine for FailingReasoner {
    fn recommend(
        &self,
        _request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationDraft>, ServiceError> {
        Err(ServiceError::Timeout(30))
    }
}
