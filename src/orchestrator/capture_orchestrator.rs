//! 捕获编排器 - 编排层
//!
//! 驱动单个会话的完整生命周期：
//! 启动 → 等待人工 → 捕获结果 → 关闭。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::PageDriver;
use crate::models::{EcEntry, SearchParams};
use crate::services;
use crate::session::{generate_session_id, AutomationSession, SessionRegistry, SessionStatus};

/// 捕获编排器
///
/// 持有注册表（显式注入，便于隔离测试），是唯一允许推进
/// 会话状态机的组件。
pub struct CaptureOrchestrator {
    config: Config,
    registry: Arc<SessionRegistry<AutomationSession>>,
}

impl CaptureOrchestrator {
    pub fn new(config: Config, registry: Arc<SessionRegistry<AutomationSession>>) -> Self {
        Self { config, registry }
    }

    /// 启动一个新的捕获会话
    ///
    /// 启动独立浏览器、导航到门户（限时，失败即致命）、尽力预填
    /// 已知参数（逐字段容错，绝不因此失败），然后注册会话并返回
    /// 标识符。返回后浏览器窗口保持打开，等待人工解验证码并提交。
    pub async fn start_session(&self, params: SearchParams) -> AppResult<String> {
        let (mut browser, page) = browser::launch_browser(&self.config).await?;
        let driver = PageDriver::new(page.clone());

        // 初始页面加载失败对本次启动是致命的，释放浏览器后原样上抛
        let nav_limit = Duration::from_secs(self.config.navigation_timeout_secs);
        if let Err(e) = driver.navigate(&self.config.portal_url, nav_limit).await {
            error!("初始页面加载失败: {}", e);
            let _ = browser.close().await;
            return Err(e);
        }
        info!("✓ 已导航到门户: {}", self.config.portal_url);

        // 预填是尽力而为：失败已在能力层逐字段记录，这里只汇总
        let outcomes = services::fill_search_form(&driver, &params).await;
        let applied = outcomes.iter().filter(|o| o.applied).count();
        info!("✓ 表单预填: {}/{} 个字段写入成功", applied, outcomes.len());

        let session_id = generate_session_id();
        let mut session =
            AutomationSession::new(session_id.clone(), params, browser, page);
        session.status = SessionStatus::WaitingForHuman;

        // 冲突概率可忽略，但必须检查；失败时会话随错误路径被丢弃，
        // 浏览器进程一并回收，注册表保持原样
        self.registry.register(&session_id, session)?;

        info!(
            "✓ 会话 {} 已创建，等待人工在浏览器中完成验证码并提交",
            session_id
        );
        Ok(session_id)
    }

    /// 等待并抓取会话的查询结果
    ///
    /// 在限定窗口（默认 120 秒，给人工解验证码留时间）内轮询结果表
    /// 标记。超时或抓取失败都会把会话置为 `Failed` 并返回捕获错误，
    /// 此时调用方仍可以选择关闭会话。成功时返回全部行和（可选的）
    /// 文书下载链接，会话进入 `Completed`。
    pub async fn capture_result(
        &self,
        session_id: &str,
    ) -> AppResult<(Vec<EcEntry>, Option<String>)> {
        // 未知标识符直接上抛 NotFound，与内部错误严格区分
        let page = self.registry.with_session(session_id, |s| s.page())?;
        let driver = PageDriver::new(page);

        let limit = Duration::from_secs(self.config.capture_timeout_secs);
        let poll = Duration::from_millis(self.config.poll_interval_ms);

        match services::wait_for_results(&driver, limit, poll).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    "⚠️ 会话 {} 等待结果超时 ({}秒)",
                    session_id, self.config.capture_timeout_secs
                );
                self.mark_failed(session_id);
                return Err(AppError::capture_timeout(
                    session_id,
                    format!("等待结果超时 ({}秒)", self.config.capture_timeout_secs),
                ));
            }
            // 会话在等待期间被关闭时，轮询会立刻以脚本错误结束
            Err(e) => {
                warn!("⚠️ 会话 {} 等待结果中断: {}", session_id, e);
                self.mark_failed(session_id);
                return Err(AppError::capture_timeout(session_id, e.to_string()));
            }
        }

        let _ = self
            .registry
            .update_session(session_id, |s| s.status = SessionStatus::Capturing);
        info!("✓ 会话 {} 检测到结果页，开始抓取", session_id);

        match services::scrape_entries(&driver).await {
            Ok(entries) => {
                let document_url = services::find_document_link(&driver).await;
                let _ = self
                    .registry
                    .update_session(session_id, |s| s.status = SessionStatus::Completed);
                Ok((entries, document_url))
            }
            Err(e) => {
                error!("❌ 会话 {} 抓取结果失败: {}", session_id, e);
                self.mark_failed(session_id);
                Err(AppError::capture_timeout(session_id, e.to_string()))
            }
        }
    }

    /// 关闭会话并释放浏览器资源
    ///
    /// 幂等：标识符未注册（从未存在或已关闭）时是空操作。
    /// 关闭会打断该会话上仍在等待的捕获调用。
    pub async fn close_session(&self, session_id: &str) {
        match self.registry.remove(session_id) {
            Some(session) => {
                session.close().await;
                info!("✓ 会话 {} 已关闭", session_id);
            }
            None => {
                debug!("会话 {} 不存在或已关闭，忽略", session_id);
            }
        }
    }

    /// 读取会话创建时的查询参数
    pub fn session_params(&self, session_id: &str) -> AppResult<SearchParams> {
        self.registry
            .with_session(session_id, |s| s.search_params.clone())
    }

    /// 读取会话当前状态
    pub fn session_status(&self, session_id: &str) -> AppResult<SessionStatus> {
        self.registry.with_session(session_id, |s| s.status)
    }

    fn mark_failed(&self, session_id: &str) {
        // 会话可能已被并发关闭，置失败失败时忽略
        let _ = self
            .registry
            .update_session(session_id, |s| s.status = SessionStatus::Failed);
    }
}
