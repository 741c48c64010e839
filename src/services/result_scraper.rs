//! 结果页抓取 - 业务能力层
//!
//! 等待结果表标记出现，把每一行抓成一条 [`EcEntry`]，
//! 并尽力定位可下载的文书链接。

use std::time::Duration;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::PageDriver;
use crate::models::EcEntry;

/// 结果表出现即视为人工已完成验证码并提交
const RESULT_TABLE_SELECTOR: &str = ".ec-result-table";
const ENTRY_ROW_SELECTOR: &str = ".ec-entry-row";
const DOCUMENT_LINK_SELECTOR: &str = ".download-pdf";

/// 等待结果表标记出现
///
/// 返回 Ok(true) 表示结果页已就绪，Ok(false) 表示等待窗口耗尽。
/// 人工解验证码可能需要数分钟，长时间等待是预期行为而非异常。
pub async fn wait_for_results(
    driver: &PageDriver,
    limit: Duration,
    poll_interval: Duration,
) -> AppResult<bool> {
    debug!(
        "等待结果表 {} 出现 (最长 {:?})...",
        RESULT_TABLE_SELECTOR, limit
    );
    driver
        .wait_for_selector(RESULT_TABLE_SELECTOR, limit, poll_interval)
        .await
}

/// 抓取结果表的全部行
pub async fn scrape_entries(driver: &PageDriver) -> AppResult<Vec<EcEntry>> {
    let js_code = format!(
        r#"
        Array.from(document.querySelectorAll('{row}')).map(row => ({{
            docNumber: row.querySelector('.doc-no')?.innerText?.trim() ?? null,
            docDate: row.querySelector('.doc-date')?.innerText?.trim() ?? null,
            nature: row.querySelector('.nature')?.innerText?.trim() ?? null,
            parties: row.querySelector('.parties')?.innerText?.trim() ?? null,
            consideration: row.querySelector('.consideration')?.innerText?.trim() ?? null,
            scheduleText: row.querySelector('.schedule')?.innerText?.trim() ?? null,
        }}))
        "#,
        row = ENTRY_ROW_SELECTOR,
    );

    let entries: Vec<EcEntry> = driver.eval_as(js_code).await?;
    info!("✓ 抓取到 {} 条 EC 记录", entries.len());
    Ok(entries)
}

/// 尽力定位可下载的文书链接
///
/// 链接缺失是常态（并非所有查询结果都附带文书），不视为错误。
pub async fn find_document_link(driver: &PageDriver) -> Option<String> {
    match driver.extract_attribute(DOCUMENT_LINK_SELECTOR, "href").await {
        Ok(Some(url)) => Some(url),
        Ok(None) => {
            debug!("结果页没有文书下载链接");
            None
        }
        Err(e) => {
            debug!("定位文书下载链接失败: {}", e);
            None
        }
    }
}
