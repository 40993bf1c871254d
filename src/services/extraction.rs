//! Biomarker extraction boundary: document image/PDF in, structured
//! `BiomarkerSet` out.
//!
//! The remote vision service may legitimately return every field null
//! (unreadable scan, wrong document type). That is a valid result,
//! "no usable data", not an error; callers decide what to do with an
//! empty set.

use base64::Engine as _;
use serde::Serialize;

use super::ServiceError;
use crate::models::BiomarkerSet;

/// Extraction instruction sent with every document.
const EXTRACTION_PROMPT: &str = "\
Extract the semen analysis values from this lab report. Respond ONLY \
with a JSON object with these keys, using null for anything not \
present: concentration (million/mL), total_motility (%), \
progressive_motility (%), morphology (% normal forms), volume (mL), \
ph, dna_fragmentation (% DFI). Use numbers, not strings.";

/// Extracts a biomarker panel from an uploaded document.
pub trait BiomarkerExtractor: Send + Sync {
    fn extract(&self, document: &[u8], content_type: &str) -> Result<BiomarkerSet, ServiceError>;
}

/// Production extractor backed by the hosted vision API.
pub struct HttpExtractor {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpExtractor {
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
struct ExtractRequest<'a> {
    prompt: &'a str,
    /// Base64 data URL of the document.
    document: String,
}

impl BiomarkerExtractor for HttpExtractor {
    fn extract(&self, document: &[u8], content_type: &str) -> Result<BiomarkerSet, ServiceError> {
        let start = std::time::Instant::now();
        let url = format!("{}/v1/extract", self.base_url);

        let encoded = base64::engine::general_purpose::STANDARD.encode(document);
        let body = ExtractRequest {
            prompt: EXTRACTION_PROMPT,
            document: format!("data:{content_type};base64,{encoded}"),
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

        let biomarkers: BiomarkerSet = response
            .json()
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            document_size = document.len(),
            empty = biomarkers.is_empty(),
            "Biomarker extraction complete"
        );

        Ok(biomarkers)
    }
}

/// Mock extractor for tests. Returns a configured panel.
pub struct MockExtractor {
    result: BiomarkerSet,
}

impl MockExtractor {
    pub fn returning(result: BiomarkerSet) -> Self {
        Self { result }
    }

    /// Simulates an unreadable document: all fields null.
    pub fn empty() -> Self {
        Self {
            result: BiomarkerSet::default(),
        }
    }
}

impl BiomarkerExtractor for MockExtractor {
    fn extract(&self, _document: &[u8], _content_type: &str) -> Result<BiomarkerSet, ServiceError> {
        Ok(self.result.clone())
    }
}

/// Mock extractor that always fails, for upstream-error paths.
pub struct FailingExtractor;

impl BiomarkerExtractor for FailingExtractor {
    fn extract(&self, _document: &[u8], _content_type: &str) -> Result<BiomarkerSet, ServiceError> {
        Err(ServiceError::Connection("mock".into()))
    }
}
