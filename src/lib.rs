//! # EC Search Capture
//!
//! 一个用于自动化获取不动产他项权利记录（EC）的 Rust 服务。
//! 门户查询流程中间需要人工解验证码，因此捕获被设计成
//! "启动 / 观察"两阶段协议，而不是一次长阻塞调用。
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 唯一的 page owner，提供 navigate / fill / wait / extract 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `boundary_parser` - 四至边界提取与置信度计算
//! - `form_filler` - 查询表单尽力预填（逐字段容错）
//! - `result_scraper` - 结果表等待与抓取
//!
//! ### ③ 会话层（Session）
//! - `session/` - 在途会话记录与进程级注册表
//! - `AutomationSession` - 被动记录，独占一个浏览器实例
//! - `SessionRegistry` - 唯一的共享可变结构，互斥访问
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/capture_flow` - 定义"一次捕获"的完整处理流程
//!   （抓取 → 解析 → 单事务落库 → 关闭会话）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/capture_orchestrator` - 会话生命周期的唯一推进者
//!   （启动 → 等待人工 → 捕获 → 关闭）
//!
//! 外围：`api/` 暴露 HTTP 端点，`db/` 是持久化协作方，
//! `browser/` 负责浏览器实例启动。

pub mod api;
pub mod app;
pub mod browser;
pub mod config;
pub mod db;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use db::Database;
pub use error::{AppError, AppResult};
pub use infrastructure::PageDriver;
pub use models::{BoundaryResult, CaseRecord, EcEntry, ParsedEntry, SearchParams};
pub use orchestrator::CaptureOrchestrator;
pub use services::{calculate_confidence, extract_boundaries};
pub use session::{AutomationSession, SessionRegistry, SessionStatus};
pub use workflow::{run_capture_flow, CaptureOutcome};
