//! Generative Language API adapter
//!
//! Sends `generateContent` requests with a JSON response schema and parses
//! the returned text as JSON. The recommendation and status fields must
//! match their enumerated values exactly.
//!
//! # Error Handling
//!
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - request timeout -> `PortError::Timeout`
//! - unparseable or off-schema body -> `PortError::Transformation`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::{Duration, Instant};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_claims::{AiAssessment, FundHealth, HealthStatus, Recommendation};

use crate::context::GroupContext;
use crate::ports::{AdvisoryPort, ClaimSubmission};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const ADAPTER_ID: &str = "gemini-advisory";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Connection settings for the Generative Language API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// API root, without a trailing slash
    pub base_url: String,
    /// Per-request timeout enforced by the HTTP client
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GeminiAdvisory {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiAdvisory {
    pub fn new(config: GeminiConfig) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.config.base_url, self.config.model)
    }

    /// Runs one structured generation and decodes the JSON answer
    async fn generate<T: DeserializeOwned>(
        &self,
        operation: &str,
        prompt: String,
        schema: Value,
    ) -> Result<T, PortError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        let url = format!("{}:generateContent", self.model_url());
        tracing::debug!(operation, model = %self.config.model, "calling advisory API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(operation, e))?;

        let response = check_status(response).await?;
        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PortError::transformation(format!("{operation}: unreadable response: {e}")))?;

        let text = envelope.text().ok_or_else(|| {
            PortError::transformation(format!("{operation}: response contained no text"))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| PortError::transformation(format!("{operation}: answer is not the expected JSON: {e}")))
    }

    fn request_error(&self, operation: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: u64::try_from(self.config.request_timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            PortError::connection_from(format!("{operation}: request failed"), error)
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: format!("advisory API rejected the key ({status})"),
        },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        s if s.is_server_error() => PortError::unavailable(format!("advisory API ({status})")),
        StatusCode::BAD_REQUEST => PortError::validation(format!("advisory API rejected the request: {body}")),
        _ => PortError::internal(format!("advisory API returned {status}: {body}")),
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct AssessmentAnswer {
    recommendation: String,
    justification: String,
}

#[derive(Debug, Deserialize)]
struct HealthAnswer {
    status: String,
    analysis: String,
}

fn assessment_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendation": {
                "type": "STRING",
                "enum": ["Approve", "Deny", "Needs Review"],
                "description": "Your recommendation for the claim."
            },
            "justification": {
                "type": "STRING",
                "description": "A brief, one-sentence justification for your recommendation."
            }
        },
        "required": ["recommendation", "justification"]
    })
}

fn health_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "status": {
                "type": "STRING",
                "enum": ["Healthy", "Stable", "At Risk"],
                "description": "The fund's health status."
            },
            "analysis": {
                "type": "STRING",
                "description": "A brief, one-sentence analysis."
            }
        },
        "required": ["status", "analysis"]
    })
}

pub(crate) fn assessment_prompt(submission: &ClaimSubmission, context: &GroupContext) -> String {
    format!(
        "Act as a claims assessor for a small community microinsurance group.\n\
         The group, {name}, is a Boda Boda (motorcycle taxi) association.\n\
         Total funds available: {pool} {currency}.\n\
         Average claim amount historically: {average} {currency}.\n\n\
         A new claim has been filed:\n\
         Description: \"{description}\"\n\
         Amount: {amount} {currency}\n\n\
         Assess this claim. Is the description plausible for a boda boda operator? \
         Is the amount reasonable compared to the description, the average claim, and the total pool size?\n\
         Provide a recommendation ('Approve', 'Deny', 'Needs Review') and a brief justification (one sentence).",
        name = context.group_name,
        pool = context.total_pool,
        currency = context.currency,
        average = context.average_claim,
        description = submission.description,
        amount = submission.amount,
    )
}

pub(crate) fn health_prompt(context: &GroupContext) -> String {
    format!(
        "Analyze the financial health of a community microinsurance pool.\n\
         Current total funds: {pool} {currency}.\n\
         Number of members: {members}.\n\
         Recent contributions (last 30 days): {contributions}.\n\
         Recent claims (last 30 days): {claims}.\n\n\
         Based on this data, provide a health status and a brief analysis (one sentence).\n\
         The status must be one of: 'Healthy', 'Stable', 'At Risk'.",
        pool = context.total_pool,
        currency = context.currency,
        members = context.member_count,
        contributions = context.recent_contributions,
        claims = context.recent_claims,
    )
}

impl DomainPort for GeminiAdvisory {}

#[async_trait]
impl HealthCheckable for GeminiAdvisory {
    /// Looks up the configured model, which also validates the key
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (status, message) = match result {
            Ok(response) if response.status().is_success() => (AdapterHealth::Healthy, None),
            Ok(response) => (
                AdapterHealth::Degraded,
                Some(format!("model lookup returned {}", response.status())),
            ),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl AdvisoryPort for GeminiAdvisory {
    async fn assess_claim(
        &self,
        submission: &ClaimSubmission,
        context: &GroupContext,
    ) -> Result<AiAssessment, PortError> {
        let answer: AssessmentAnswer = self
            .generate("assess_claim", assessment_prompt(submission, context), assessment_schema())
            .await?;
        let recommendation = Recommendation::from_str(&answer.recommendation)
            .map_err(|e| PortError::transformation(e.to_string()))?;
        Ok(AiAssessment::new(recommendation, answer.justification))
    }

    async fn predict_health(&self, context: &GroupContext) -> Result<FundHealth, PortError> {
        let answer: HealthAnswer = self
            .generate("predict_health", health_prompt(context), health_schema())
            .await?;
        let status = HealthStatus::parse_reported(&answer.status)
            .map_err(|e| PortError::transformation(e.to_string()))?;
        Ok(FundHealth::new(status, answer.analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn context() -> GroupContext {
        GroupContext {
            group_name: "Kamukunji Boda Boda Association".to_string(),
            currency: Currency::KES,
            total_pool: dec!(4000),
            member_count: 5,
            recent_contributions: 3,
            recent_claims: 1,
            average_claim: dec!(1000),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("key").with_base_url("http://localhost:9000/");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_prompts_carry_context() {
        let submission = ClaimSubmission::new("Puncture repair and new tube.", dec!(500));
        let prompt = assessment_prompt(&submission, &context());
        assert!(prompt.contains("Puncture repair and new tube."));
        assert!(prompt.contains("Average claim amount historically: 1000 KES"));

        let prompt = health_prompt(&context());
        assert!(prompt.contains("Number of members: 5."));
        assert!(prompt.contains("'Healthy', 'Stable', 'At Risk'"));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let envelope: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"status\":" }, { "text": "\"Stable\"}" }] } }]
        }))
        .unwrap();
        assert_eq!(envelope.text().unwrap(), "{\"status\":\"Stable\"}");

        let empty: GenerateContentResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(empty.text().is_none());
    }
}
