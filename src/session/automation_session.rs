//! 自动化会话
//!
//! 一次"人工协助捕获"的在途记录：独占一个浏览器实例和页面，
//! 携带创建时刻的查询参数和状态机。会话本身是被动记录，
//! 状态迁移完全由捕获编排器驱动。

use chromiumoxide::{Browser, Page};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::SearchParams;

/// 会话状态
///
/// 状态机：
/// `Initializing` →（表单预填完成）→ `WaitingForHuman`
/// →（检测到结果页）→ `Capturing` →（抓取成功）→ `Completed`；
/// 抓取失败或超时 → `Failed`。
/// 任意状态 →（显式释放）→ `Closed`，终态且幂等。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    WaitingForHuman,
    Capturing,
    Completed,
    Failed,
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Initializing => "initializing",
            SessionStatus::WaitingForHuman => "waiting_for_human",
            SessionStatus::Capturing => "capturing",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
            SessionStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成会话标识符（32 位十六进制随机令牌）
pub fn generate_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// 自动化会话
///
/// 一个会话独占恰好一个浏览器实例；`id`、`created_at` 与
/// `search_params` 创建后不可变，只有 `status` 会被编排器推进。
pub struct AutomationSession {
    pub id: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub search_params: SearchParams,
    browser: Browser,
    page: Page,
}

impl AutomationSession {
    pub fn new(id: String, search_params: SearchParams, browser: Browser, page: Page) -> Self {
        Self {
            id,
            status: SessionStatus::Initializing,
            created_at: Utc::now(),
            search_params,
            browser,
            page,
        }
    }

    /// 获取页面句柄
    ///
    /// chromiumoxide 的 Page 内部使用 Arc，clone 开销很小；
    /// 调用方拿到句柄后不得持有注册表锁跨 await 使用。
    pub fn page(&self) -> Page {
        self.page.clone()
    }

    /// 释放会话占用的浏览器资源
    ///
    /// 消费会话本身；关闭失败只记日志（浏览器进程随句柄丢弃被回收），
    /// 因此对调用方而言释放永远"成功"。关闭会打断该页面上
    /// 仍在进行的等待轮询。
    pub async fn close(mut self) {
        self.status = SessionStatus::Closed;
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器时出错 (会话 {}): {}", self.id, e);
        }
        debug!("会话 {} 的浏览器句柄已释放", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str_matches_wire_names() {
        assert_eq!(SessionStatus::Initializing.as_str(), "initializing");
        assert_eq!(SessionStatus::WaitingForHuman.as_str(), "waiting_for_human");
        assert_eq!(SessionStatus::Capturing.as_str(), "capturing");
        assert_eq!(SessionStatus::Completed.as_str(), "completed");
        assert_eq!(SessionStatus::Failed.as_str(), "failed");
        assert_eq!(SessionStatus::Closed.as_str(), "closed");
    }

    #[test]
    fn test_generated_ids_are_unique_hex_tokens() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
