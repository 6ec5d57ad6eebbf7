//! HTTP surface: the strategy endpoint, its legacy alias and the unlock check.

use crate::browser::entitlement::EntitlementCheck;
use crate::core::form::FormInput;
use crate::error::LabError;
use crate::orchestrator::Orchestrator;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub const STRATEGY_ERROR_MESSAGE: &str = "AI 전략 생성 중 오류가 발생했습니다.";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub entitlement: Arc<dyn EntitlementCheck>,
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
}

fn post_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    post(handler)
        .options(handle_preflight)
        .fallback(method_not_allowed)
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/strategy", post_only(handle_strategy))
        .route("/api/generate-strategy", post_only(handle_strategy))
        .route("/api/unlock", post_only(handle_unlock))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(bind_addr: &str, state: AppState) -> Result<(), LabError> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| LabError::ConfigError(format!("BIND_ADDR '{bind_addr}': {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 Listening on http://{addr}");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn handle_strategy(State(state): State<AppState>, body: Bytes) -> Response {
    let form: FormInput = match serde_json::from_slice(&body) {
        Ok(form) => form,
        Err(e) => {
            log::warn!("Rejected strategy request body: {e}");
            return error_response(&LabError::JsonError(e));
        }
    };

    match state.orchestrator.build_strategy(&form).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn handle_unlock(State(state): State<AppState>, body: Bytes) -> Response {
    let unlocked = serde_json::from_slice::<UnlockRequest>(&body)
        .map(|req| state.entitlement.verify(&req.code))
        .unwrap_or(false);
    (StatusCode::OK, Json(UnlockResponse { unlocked })).into_response()
}

async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn error_response(err: &LabError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": STRATEGY_ERROR_MESSAGE,
            "details": err.to_string(),
        })),
    )
        .into_response()
}
