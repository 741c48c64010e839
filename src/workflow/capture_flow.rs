//! 捕获处理流程 - 流程层
//!
//! 定义"一次捕获"的完整处理流程：
//! 1. 抓取结果（等待人工完成验证码）
//! 2. 逐条提取四至边界并计算置信度
//! 3. 整案一个事务落库
//! 4. 关闭会话释放浏览器
//!
//! 持久化失败时事务已整体回滚，但浏览器会话仍然会被关闭，
//! 避免资源泄漏；错误原样上抛，绝不静默吞掉。

use tracing::{info, warn};

use crate::db::Database;
use crate::error::AppResult;
use crate::models::{CaseRecord, ParsedEntry};
use crate::orchestrator::CaptureOrchestrator;
use crate::services::{calculate_confidence, extract_boundaries};
use crate::utils::logging::truncate_text;

/// 一次捕获的最终产出
#[derive(Debug)]
pub struct CaptureOutcome {
    pub case_id: i64,
    pub entries: Vec<ParsedEntry>,
    pub document_url: Option<String>,
}

/// 执行完整的捕获流程
///
/// 捕获失败（超时、会话不存在）时会话不会被自动关闭，
/// 调用方可自行决定是否关闭；捕获成功后无论落库成败都会关闭会话。
pub async fn run_capture_flow(
    orchestrator: &CaptureOrchestrator,
    db: &Database,
    session_id: &str,
    user_id: Option<&str>,
) -> AppResult<CaptureOutcome> {
    // 先取会话的真实查询参数：会话关闭后就取不到了
    let search_params = orchestrator.session_params(session_id)?;

    let (entries, document_url) = orchestrator.capture_result(session_id).await?;

    // ========== 逐条提取边界 ==========
    let parsed: Vec<ParsedEntry> = entries
        .into_iter()
        .map(|entry| {
            let boundaries = extract_boundaries(entry.schedule_text.as_deref());
            let confidence = calculate_confidence(&boundaries);
            if let Some(text) = &entry.schedule_text {
                info!(
                    "  边界提取 [{}] 置信度 {:.2}: {}",
                    entry.doc_number.as_deref().unwrap_or("-"),
                    confidence,
                    truncate_text(text, 60)
                );
            }
            ParsedEntry {
                entry,
                boundaries,
                confidence,
            }
        })
        .collect();
    info!("✓ 解析完成: 共 {} 条记录", parsed.len());

    // ========== 整案落库（单事务） ==========
    let case = CaseRecord {
        user_id: user_id.unwrap_or("guest").to_string(),
        search_params,
    };
    let save_result = db.save_case(&case, &parsed).await;

    // 无论落库成败都关闭会话，不泄漏浏览器
    orchestrator.close_session(session_id).await;

    let case_id = match save_result {
        Ok(case_id) => case_id,
        Err(e) => {
            warn!("⚠️ 案件落库失败，事务已回滚: {}", e);
            return Err(e);
        }
    };

    info!("✅ 案件 {} 落库完成 ({} 条记录)", case_id, parsed.len());

    Ok(CaptureOutcome {
        case_id,
        entries: parsed,
        document_url,
    })
}
