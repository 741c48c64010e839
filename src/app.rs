//! 应用生命周期
//!
//! 初始化共享资源（数据库、会话注册表、编排器）并运行 HTTP 服务。

use std::sync::Arc;

use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::orchestrator::CaptureOrchestrator;
use crate::session::SessionRegistry;

/// 应用主结构
pub struct App {
    config: Config,
    state: Arc<AppState>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let db = Database::new(&config.database_path)?;

        // 注册表显式构造后注入编排器，不做环境全局状态
        let registry = Arc::new(SessionRegistry::new());
        let orchestrator = CaptureOrchestrator::new(config.clone(), registry);

        let state = Arc::new(AppState { orchestrator, db });

        Ok(Self { config, state })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> AppResult<()> {
        let router = api::build_router(self.state, &self.config);

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .map_err(|e| AppError::Other(format!("绑定 {} 失败: {}", self.config.bind_addr, e)))?;

        info!("🚀 服务已启动: http://{}", self.config.bind_addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| AppError::Other(format!("HTTP 服务异常退出: {}", e)))?;

        Ok(())
    }
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 EC 查询捕获服务启动");
    info!("📄 目标门户: {}", config.portal_url);
    info!(
        "⏱️ 导航超时: {}秒 / 捕获等待: {}秒",
        config.navigation_timeout_secs, config.capture_timeout_secs
    );
    info!("{}", "=".repeat(60));
}
