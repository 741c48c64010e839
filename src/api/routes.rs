//! HTTP API 路由
//!
//! 薄封装层：把两阶段捕获协议暴露为两个端点，并把类型化错误翻译
//! 成 HTTP 状态码。会话不存在 → 404（调用方可纠正），
//! 缺少 sessionId → 400，其余未处理失败 → 500。

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::error;

use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;
use crate::models::SearchParams;
use crate::orchestrator::CaptureOrchestrator;
use crate::workflow;

/// 路由共享状态
pub struct AppState {
    pub orchestrator: CaptureOrchestrator,
    pub db: Database,
}

/// 构建应用路由
pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/api/ec/start-search", post(start_search))
        .route("/api/ec/fetch-and-parse", post(fetch_and_parse))
        .layer(cors_layer(config))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StartSearchRequest {
    district: Option<String>,
    sro: Option<String>,
    doc_number: Option<String>,
    year: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FetchAndParseRequest {
    session_id: Option<String>,
    user_id: Option<String>,
}

/// POST /api/ec/start-search
///
/// 第一阶段：启动浏览器会话并立即返回标识符，
/// 浏览器窗口留给人工解验证码。
async fn start_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartSearchRequest>,
) -> Response {
    let params = SearchParams {
        district: req.district,
        sro: req.sro,
        doc_number: req.doc_number,
        year: req.year,
    };

    match state.orchestrator.start_session(params).await {
        Ok(session_id) => (
            StatusCode::OK,
            Json(json!({
                "sessionId": session_id,
                "message": "Browser session started. Please solve the CAPTCHA and submit the form in the opened browser window.",
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /api/ec/fetch-and-parse
///
/// 第二阶段：等待并抓取结果、提取边界、整案落库。
async fn fetch_and_parse(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FetchAndParseRequest>,
) -> Response {
    let Some(session_id) = req.session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Session ID is required" })),
        )
            .into_response();
    };

    match workflow::run_capture_flow(
        &state.orchestrator,
        &state.db,
        &session_id,
        req.user_id.as_deref(),
    )
    .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "caseId": outcome.case_id,
                "entries": outcome.entries,
                "documentUrl": outcome.document_url,
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &AppError) -> Response {
    error!("请求处理失败: {}", err);
    let status = if err.is_session_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// CORS 策略：未配置来源时放开全部，配置了则按列表精确放行
fn cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
