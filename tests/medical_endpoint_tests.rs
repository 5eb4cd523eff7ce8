// /medical endpoint tests against the full router
// Author: kelexine (https://github.com/kelexine)

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use painvestex::assistant::{AnswerGenerator, Assistant, IDENTITY_REPLY};
use painvestex::config::AssistantConfig;
use painvestex::error::{Result, ServiceError};
use painvestex::genai::{GenerationMethod, ModelRef};
use painvestex::server::{create_router, MAX_BODY_BYTES};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Returns a fixed answer and counts calls.
struct CountingGenerator {
    calls: AtomicUsize,
    prompts: parking_lot::Mutex<Vec<String>>,
}

impl CountingGenerator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: parking_lot::Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerGenerator for CountingGenerator {
    async fn generate(&self, _model: &ModelRef, prompt: &str, max_output_tokens: u32) -> Result<String> {
        assert_eq!(max_output_tokens, 800);
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().push(prompt.to_string());
        Ok(format!("generated answer {}", n))
    }
}

struct BrokenGenerator;

#[async_trait]
impl AnswerGenerator for BrokenGenerator {
    async fn generate(&self, _model: &ModelRef, _prompt: &str, _max: u32) -> Result<String> {
        Err(ServiceError::Provider("Resource has been exhausted (e.g. check quota).".to_string()))
    }
}

fn test_model() -> Option<ModelRef> {
    Some(ModelRef::new("models/text-bison-001", GenerationMethod::GenerateText))
}

fn router(model: Option<ModelRef>, generator: Arc<dyn AnswerGenerator>) -> Router {
    let assistant = Assistant::new(model, generator, &AssistantConfig::default());
    create_router(Arc::new(assistant))
}

async fn post_medical(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/medical")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_greeting_scenario() {
    let generator = CountingGenerator::new();
    let app = router(test_model(), generator.clone());

    let (status, body) = post_medical(&app, r#"{"question": "hello, greeting"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "painvestex is an assistant here to help with any questions you have."}));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_greeting_without_model() {
    let app = router(None, Arc::new(BrokenGenerator));

    let (status, body) = post_medical(&app, r#"{"question": "Who are you?"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], IDENTITY_REPLY);
}

#[tokio::test]
async fn test_empty_object_is_rejected() {
    let app = router(test_model(), CountingGenerator::new());

    let (status, body) = post_medical(&app, "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No input data provided"}));
}

#[tokio::test]
async fn test_missing_and_malformed_bodies_are_rejected() {
    let app = router(test_model(), CountingGenerator::new());

    for payload in ["", "{not json", "null"] {
        let (status, body) = post_medical(&app, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
        assert_eq!(body["error"], "No input data provided");
    }
}

#[tokio::test]
async fn test_no_model_refuses_questions() {
    let app = router(None, CountingGenerator::new());

    let (status, body) = post_medical(&app, r#"{"question": "What is fever?"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "No suitable AI model found"}));
}

#[tokio::test]
async fn test_repeated_question_hits_cache() {
    let generator = CountingGenerator::new();
    let app = router(test_model(), generator.clone());

    let (first_status, first) = post_medical(&app, r#"{"question": "What is fever?"}"#).await;
    let (second_status, second) = post_medical(&app, r#"{"question": "What is fever?"}"#).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(first["response"], "generated answer 1");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_cache_ignores_case() {
    let generator = CountingGenerator::new();
    let app = router(test_model(), generator.clone());

    let (_, first) = post_medical(&app, r#"{"question": "What is fever?"}"#).await;
    let (_, second) = post_medical(&app, r#"{"question": "what is FEVER?"}"#).await;

    assert_eq!(first["response"], second["response"]);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_prompt_carries_original_question() {
    let generator = CountingGenerator::new();
    let app = router(test_model(), generator.clone());

    post_medical(&app, r#"{"question": "What is FEVER?"}"#).await;

    let prompts = generator.prompts.lock();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("The question: What is FEVER?"));
}

#[tokio::test]
async fn test_missing_question_is_empty_string() {
    let generator = CountingGenerator::new();
    let app = router(test_model(), generator.clone());

    let (status, body) = post_medical(&app, r#"{"topic": "health"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "generated answer 1");
    assert!(generator.prompts.lock()[0].contains("The question: \n"));
}

#[tokio::test]
async fn test_provider_failure_is_generic_error() {
    let app = router(test_model(), Arc::new(BrokenGenerator));

    let (status, body) = post_medical(&app, r#"{"question": "What is fever?"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Resource has been exhausted (e.g. check quota)."}));
}

#[tokio::test]
async fn test_non_object_bodies_use_the_single_client_error() {
    let app = router(test_model(), CountingGenerator::new());

    for payload in [r#"["What is fever?"]"#, r#""What is fever?""#, r#"{"question": 42}"#] {
        let (status, body) = post_medical(&app, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
        assert_eq!(body, json!({"error": "No input data provided"}));
    }
}

#[tokio::test]
async fn test_long_question_is_answered() {
    let generator = CountingGenerator::new();
    let app = router(test_model(), generator.clone());
    let question = "a".repeat(70 * 1024);
    let payload = json!({ "question": question }).to_string();

    let (status, body) = post_medical(&app, payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "generated answer 1");
    assert!(generator.prompts.lock()[0].contains(&question));
}

#[tokio::test]
async fn test_oversized_body_gets_json_error() {
    let generator = CountingGenerator::new();
    let app = router(test_model(), generator.clone());
    let payload = vec![b' '; MAX_BODY_BYTES + 1];

    let (status, body) = post_medical(&app, payload).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_health_reports_degraded_without_model() {
    let app = router(None, CountingGenerator::new());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["model_resolution"]["status"], "error");
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = router(test_model(), CountingGenerator::new());

    let request = Request::builder()
        .method("POST")
        .uri("/medical")
        .header("x-request-id", "req-123")
        .body(Body::from(r#"{"question": "greeting"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}
