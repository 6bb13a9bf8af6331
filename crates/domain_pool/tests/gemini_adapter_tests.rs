//! Gemini advisory adapter against a mock HTTP server

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use core_kernel::{Currency, PortError};
use domain_claims::{HealthStatus, Recommendation};
use domain_pool::{AdvisoryPort, ClaimSubmission, GeminiAdvisory, GeminiConfig, GroupContext};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn adapter(server: &MockServer) -> GeminiAdvisory {
    GeminiAdvisory::new(GeminiConfig::new("test-key").with_base_url(server.uri())).expect("client")
}

fn context() -> GroupContext {
    GroupContext {
        group_name: "Kamukunji Boda Boda Association".to_string(),
        currency: Currency::KES,
        total_pool: dec!(2500),
        member_count: 5,
        recent_contributions: 3,
        recent_claims: 1,
        average_claim: dec!(1000),
    }
}

fn submission() -> ClaimSubmission {
    ClaimSubmission::new("Puncture repair and new tube.", dec!(500))
}

/// Wraps a JSON answer the way the API returns generated text
fn answer(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": value.to_string() }] },
            "finishReason": "STOP"
        }]
    }))
}

#[tokio::test]
async fn assess_claim_parses_structured_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(answer(json!({
            "recommendation": "Needs Review",
            "justification": "Amount is plausible but the description is vague."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let assessment = adapter(&server).assess_claim(&submission(), &context()).await.unwrap();

    assert_eq!(assessment.recommendation, Recommendation::NeedsReview);
    assert_eq!(assessment.justification, "Amount is plausible but the description is vague.");
}

#[tokio::test]
async fn predict_health_parses_structured_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(answer(json!({
            "status": "At Risk",
            "analysis": "Claims are outpacing contributions."
        })))
        .mount(&server)
        .await;

    let health = adapter(&server).predict_health(&context()).await.unwrap();

    assert_eq!(health.status, HealthStatus::AtRisk);
    assert_eq!(health.analysis, "Claims are outpacing contributions.");
}

#[tokio::test]
async fn unknown_recommendation_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(answer(json!({ "recommendation": "Maybe", "justification": "Unsure." })))
        .mount(&server)
        .await;

    let err = adapter(&server).assess_claim(&submission(), &context()).await.unwrap_err();
    assert!(matches!(err, PortError::Transformation { .. }));
}

#[tokio::test]
async fn unknown_is_not_a_reportable_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(answer(json!({ "status": "Unknown", "analysis": "No idea." })))
        .mount(&server)
        .await;

    let err = adapter(&server).predict_health(&context()).await.unwrap_err();
    assert!(matches!(err, PortError::Transformation { .. }));
}

#[tokio::test]
async fn non_json_text_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I think you should approve it." }] } }]
        })))
        .mount(&server)
        .await;

    let err = adapter(&server).assess_claim(&submission(), &context()).await.unwrap_err();
    assert!(matches!(err, PortError::Transformation { .. }));
}

#[tokio::test]
async fn rejected_key_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = adapter(&server).predict_health(&context()).await.unwrap_err();
    assert!(matches!(err, PortError::Unauthorized { .. }));
}

#[tokio::test]
async fn rate_limit_honours_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let err = adapter(&server).assess_claim(&submission(), &context()).await.unwrap_err();
    assert!(matches!(err, PortError::RateLimited { retry_after_secs: 12 }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = adapter(&server).assess_claim(&submission(), &context()).await.unwrap_err();
    assert!(matches!(err, PortError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn health_check_looks_up_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models/gemini-2.5-flash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "models/gemini-2.5-flash" })))
        .mount(&server)
        .await;

    use core_kernel::{AdapterHealth, HealthCheckable};
    let result = adapter(&server).health_check().await;
    assert_eq!(result.status, AdapterHealth::Healthy);
    assert_eq!(result.adapter_id, "gemini-advisory");
}
