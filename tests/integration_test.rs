use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use ec_search_capture::api::{build_router, AppState};
use ec_search_capture::error::{AppError, SessionError};
use ec_search_capture::utils::logging;
use ec_search_capture::{
    CaptureOrchestrator, Config, Database, SearchParams, SessionRegistry,
};

fn test_orchestrator() -> CaptureOrchestrator {
    let config = Config::default();
    CaptureOrchestrator::new(config, Arc::new(SessionRegistry::new()))
}

#[tokio::test]
async fn test_capture_with_unknown_session_id_is_not_found() {
    let orchestrator = test_orchestrator();

    // 从未发出过的标识符必须报"会话不存在"，而不是笼统的内部错误
    let err = orchestrator
        .capture_result("never-issued")
        .await
        .expect_err("未知会话不应捕获成功");

    assert!(matches!(
        err,
        AppError::Session(SessionError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_close_session_is_idempotent() {
    let orchestrator = test_orchestrator();

    // 未注册的标识符关闭两次都不报错
    orchestrator.close_session("never-issued").await;
    orchestrator.close_session("never-issued").await;
}

#[tokio::test]
async fn test_session_params_for_unknown_session_is_not_found() {
    let orchestrator = test_orchestrator();
    let err = orchestrator.session_params("never-issued").unwrap_err();
    assert!(err.is_session_not_found());
}

// ========== HTTP API ==========

fn test_router(dir: &tempfile::TempDir) -> axum::Router {
    let config = Config::default();
    let db = Database::new(dir.path().join("api-test.db")).expect("打开数据库失败");
    let orchestrator = CaptureOrchestrator::new(config.clone(), Arc::new(SessionRegistry::new()));
    build_router(Arc::new(AppState { orchestrator, db }), &config)
}

#[tokio::test]
async fn test_fetch_and_parse_without_session_id_is_bad_request() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ec/fetch-and-parse")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .expect("构造请求失败"),
        )
        .await
        .expect("请求执行失败");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_and_parse_with_unknown_session_id_is_not_found() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ec/fetch-and-parse")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"sessionId": "deadbeefdeadbeefdeadbeefdeadbeef"}"#,
                ))
                .expect("构造请求失败"),
        )
        .await
        .expect("请求执行失败");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== 依赖真实浏览器和门户的测试 ==========

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_start_and_close_session() {
    logging::init();

    let config = Config::from_env();
    let orchestrator =
        CaptureOrchestrator::new(config, Arc::new(SessionRegistry::new()));

    let session_id = orchestrator
        .start_session(SearchParams::default())
        .await
        .expect("启动会话失败");
    assert_eq!(session_id.len(), 32);

    orchestrator.close_session(&session_id).await;
    // 关闭后再查即为不存在
    assert!(orchestrator.session_params(&session_id).is_err());
}

#[tokio::test]
#[ignore]
async fn test_full_capture_flow_with_manual_captcha() {
    logging::init();

    let config = Config::from_env();
    let orchestrator =
        CaptureOrchestrator::new(config.clone(), Arc::new(SessionRegistry::new()));

    let params = SearchParams {
        district: Some("1".to_string()),
        sro: Some("101".to_string()),
        doc_number: Some("1234".to_string()),
        year: Some("2023".to_string()),
    };

    let session_id = orchestrator
        .start_session(params)
        .await
        .expect("启动会话失败");

    println!("请在打开的浏览器窗口中完成验证码并提交表单...");

    let (entries, document_url) = orchestrator
        .capture_result(&session_id)
        .await
        .expect("捕获结果失败");

    println!("抓取到 {} 条记录, 文书链接: {:?}", entries.len(), document_url);

    orchestrator.close_session(&session_id).await;
}

#[tokio::test]
#[ignore]
async fn test_capture_timeout_marks_session_failed() {
    logging::init();

    // 把捕获窗口压到 2 秒：不提交表单，等待必然超时
    let mut config = Config::from_env();
    config.capture_timeout_secs = 2;

    let registry = Arc::new(SessionRegistry::new());
    let orchestrator = CaptureOrchestrator::new(config, registry);

    let session_id = orchestrator
        .start_session(SearchParams::default())
        .await
        .expect("启动会话失败");

    let err = orchestrator
        .capture_result(&session_id)
        .await
        .expect_err("无人提交时捕获应超时");
    assert!(matches!(
        err,
        AppError::Session(SessionError::CaptureTimeout { .. })
    ));

    // 超时后会话进入 failed，但仍然可以正常关闭
    let status = orchestrator
        .session_status(&session_id)
        .expect("会话应仍在注册表中");
    assert_eq!(status, ec_search_capture::SessionStatus::Failed);

    orchestrator.close_session(&session_id).await;
    assert!(orchestrator.session_status(&session_id).is_err());

    // 等待浏览器进程回收
    tokio::time::sleep(Duration::from_millis(300)).await;
}
