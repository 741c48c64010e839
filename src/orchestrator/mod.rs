//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层驱动"人工协助捕获"的两阶段协议，是会话状态机的唯一推进者。
//!
//! ### 为什么是两阶段
//!
//! 验证码无法自动求解，所以捕获被拆成两个调用而不是一个长阻塞调用：
//!
//! 1. **启动阶段**（机器驱动，快）：启动浏览器、导航、预填已知参数、
//!    注册会话并立刻返回标识符，浏览器窗口留给人工操作。
//! 2. **捕获阶段**（人工门控，慢）：按标识符等待结果页出现并抓取。
//!    等待窗口默认 120 秒，长时间挂起是预期行为。
//!
//! 两阶段之间由会话注册表衔接；会话彼此独立，没有跨会话顺序保证，
//! 也不需要。失败不内置重试——由调用方决定是否重新开一个会话。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::CaptureOrchestrator (会话生命周期)
//!     ↓
//! services (能力层：form_filler / result_scraper)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```

pub mod capture_orchestrator;

pub use capture_orchestrator::CaptureOrchestrator;
