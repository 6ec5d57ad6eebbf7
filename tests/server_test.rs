// Integration tests for the HTTP surface, with a scripted generator in place of Gemini.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use marketing_lab::ai::client::TextGenerator;
use marketing_lab::ai::prompts::{PromptBuilder, PromptVersion};
use marketing_lab::browser::entitlement::SharedCodeEntitlement;
use marketing_lab::config::FormLimits;
use marketing_lab::core::normalizer::Normalizer;
use marketing_lab::error::LabError;
use marketing_lab::orchestrator::Orchestrator;
use marketing_lab::server::{create_router, AppState, STRATEGY_ERROR_MESSAGE};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

enum Script {
    Reply(String),
    Fail,
    Hang,
}

struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
    schemas: Mutex<Vec<Option<Value>>>,
}

impl ScriptedGenerator {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
            schemas: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, response_schema: Option<Value>) -> Result<String, LabError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.schemas.lock().unwrap().push(response_schema);
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Fail => Err(LabError::GenerationFailed("API Error 503: overloaded".into())),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn router_with(generator: Arc<ScriptedGenerator>, version: PromptVersion) -> Router {
    let orchestrator = Orchestrator::new(
        generator,
        PromptBuilder::new(version, FormLimits::default()),
        Normalizer::default(),
        Duration::from_millis(200),
    );
    create_router(AppState {
        orchestrator: Arc::new(orchestrator),
        entitlement: Arc::new(SharedCodeEntitlement::new("12345")),
    })
}

fn form_body() -> Value {
    json!({
        "industry": "카페",
        "storeName": "합정 로스터리",
        "district": "합정동",
        "monthlySales": 1000,
        "platforms": ["naver"],
        "faqs": ["주차 가능한가요?"]
    })
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("origin", "http://localhost:8080");
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    router
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("oneshot failed")
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

#[tokio::test]
async fn test_strategy_returns_normalized_result() {
    let reply = "```json\n{\"hashtags\": [\"#a\"], \"strategies\": []}\n```";
    let generator = ScriptedGenerator::new(Script::Reply(reply.into()));
    let resp = send(router_with(generator.clone(), PromptVersion::Detailed), "POST", "/api/strategy", Some(form_body())).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let body = body_json(resp).await;
    assert_eq!(body["weeklyPlan"].as_array().unwrap().len(), 12);
    assert_eq!(body["hashtags"][1], "#마포카페");
    assert_eq!(body["expectedResults"]["after"]["sales"], 13_000_000);
    assert_eq!(body["strategies"][0]["title"], "시그니처 메뉴 스토리 콘텐츠");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("합정 로스터리"));
    assert!(generator.schemas.lock().unwrap()[0].is_none());
}

#[tokio::test]
async fn test_garbage_reply_still_succeeds() {
    let generator = ScriptedGenerator::new(Script::Reply("죄송합니다, 지금은 답변할 수 없습니다.".into()));
    let resp = send(router_with(generator, PromptVersion::Compact), "POST", "/api/strategy", Some(form_body())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["diagnosis"]["strengths"].as_array().unwrap().len(), 3);
    assert_eq!(body["expectedResults"]["period"], "3개월");
}

#[tokio::test]
async fn test_structured_version_sends_schema() {
    let generator = ScriptedGenerator::new(Script::Reply("{}".into()));
    let resp = send(router_with(generator.clone(), PromptVersion::Structured), "POST", "/api/strategy", Some(form_body())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let schemas = generator.schemas.lock().unwrap();
    let schema = schemas[0].as_ref().expect("schema should be sent");
    assert!(schema["properties"]["weeklyPlan"].is_object());
}

#[tokio::test]
async fn test_legacy_route_is_served() {
    let generator = ScriptedGenerator::new(Script::Reply("{}".into()));
    let resp = send(router_with(generator, PromptVersion::Detailed), "POST", "/api/generate-strategy", Some(form_body())).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let generator = ScriptedGenerator::new(Script::Reply("{}".into()));
    let resp = send(router_with(generator.clone(), PromptVersion::Detailed), "GET", "/api/strategy", None).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(resp).await["error"], "Method not allowed");
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bare_options_returns_empty_ok() {
    let generator = ScriptedGenerator::new(Script::Reply("{}".into()));
    let resp = send(router_with(generator, PromptVersion::Detailed), "OPTIONS", "/api/strategy", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_cors_preflight() {
    let generator = ScriptedGenerator::new(Script::Reply("{}".into()));
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/strategy")
        .header("origin", "http://localhost:8080")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = router_with(generator, PromptVersion::Detailed).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
    assert!(headers["access-control-allow-headers"].to_str().unwrap().contains("content-type"));
}

#[tokio::test]
async fn test_upstream_failure_is_500_with_details() {
    let generator = ScriptedGenerator::new(Script::Fail);
    let resp = send(router_with(generator, PromptVersion::Detailed), "POST", "/api/strategy", Some(form_body())).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["error"], STRATEGY_ERROR_MESSAGE);
    assert!(body["details"].as_str().unwrap().contains("overloaded"));
}

#[tokio::test]
async fn test_hung_upstream_times_out() {
    let generator = ScriptedGenerator::new(Script::Hang);
    let resp = send(router_with(generator, PromptVersion::Detailed), "POST", "/api/strategy", Some(form_body())).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(resp).await["details"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_invalid_submission_is_500() {
    let generator = ScriptedGenerator::new(Script::Reply("{}".into()));
    let mut body = form_body();
    body["storeName"] = json!("");
    let resp = send(router_with(generator.clone(), PromptVersion::Detailed), "POST", "/api/strategy", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(resp).await["details"].as_str().unwrap().contains("storeName"));
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unlock_checks_shared_code() {
    let generator = ScriptedGenerator::new(Script::Reply("{}".into()));
    let router = router_with(generator, PromptVersion::Detailed);

    let ok = send(router.clone(), "POST", "/api/unlock", Some(json!({ "code": "12345" }))).await;
    assert_eq!(body_json(ok).await["unlocked"], true);

    let bad = send(router, "POST", "/api/unlock", Some(json!({ "code": "11111" }))).await;
    assert_eq!(body_json(bad).await["unlocked"], false);
}
