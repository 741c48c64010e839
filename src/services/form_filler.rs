//! 查询表单预填 - 业务能力层
//!
//! 把已知的查询参数尽力填入门户表单。每个字段独立容错：
//! 某个字段定位失败或赋值失败只记日志，绝不中断其他字段，
//! 也绝不导致会话启动失败——表单本来就允许只预填一部分参数，
//! 剩下的由人工在浏览器里补齐。

use tracing::{debug, warn};

use crate::infrastructure::PageDriver;
use crate::models::SearchParams;

const DISTRICT_SELECTOR: &str = "#district";
const SRO_SELECTOR: &str = "#sro";
const DOC_NUMBER_SELECTOR: &str = "#docNumber";
const YEAR_SELECTOR: &str = "#year";

/// 单个字段的预填结果
#[derive(Debug, Clone)]
pub struct FieldFillOutcome {
    /// 字段名（district / sro / docNumber / year）
    pub field: &'static str,
    /// 是否成功写入
    pub applied: bool,
    /// 失败原因（成功时为 None）
    pub detail: Option<String>,
}

/// 尽力预填查询表单
///
/// 逐字段独立执行，收集所有结果返回；本函数永不失败。
pub async fn fill_search_form(driver: &PageDriver, params: &SearchParams) -> Vec<FieldFillOutcome> {
    let mut outcomes = Vec::new();

    if let Some(district) = &params.district {
        outcomes.push(select_field(driver, "district", DISTRICT_SELECTOR, district).await);
    }
    if let Some(sro) = &params.sro {
        outcomes.push(select_field(driver, "sro", SRO_SELECTOR, sro).await);
    }
    if let Some(doc_number) = &params.doc_number {
        outcomes.push(fill_field(driver, "docNumber", DOC_NUMBER_SELECTOR, doc_number).await);
    }
    if let Some(year) = &params.year {
        outcomes.push(fill_field(driver, "year", YEAR_SELECTOR, year).await);
    }

    let applied = outcomes.iter().filter(|o| o.applied).count();
    debug!("表单预填完成: {}/{} 个字段写入成功", applied, outcomes.len());

    outcomes
}

async fn select_field(
    driver: &PageDriver,
    field: &'static str,
    selector: &str,
    value: &str,
) -> FieldFillOutcome {
    match driver.select_option(selector, value).await {
        Ok(true) => FieldFillOutcome {
            field,
            applied: true,
            detail: None,
        },
        Ok(false) => {
            warn!("⚠️ 字段 {} 未找到目标元素 ({})", field, selector);
            FieldFillOutcome {
                field,
                applied: false,
                detail: Some(format!("未找到元素 {}", selector)),
            }
        }
        Err(e) => {
            warn!("⚠️ 字段 {} 写入失败: {}", field, e);
            FieldFillOutcome {
                field,
                applied: false,
                detail: Some(e.to_string()),
            }
        }
    }
}

async fn fill_field(
    driver: &PageDriver,
    field: &'static str,
    selector: &str,
    value: &str,
) -> FieldFillOutcome {
    match driver.fill(selector, value).await {
        Ok(true) => FieldFillOutcome {
            field,
            applied: true,
            detail: None,
        },
        Ok(false) => {
            warn!("⚠️ 字段 {} 未找到目标元素 ({})", field, selector);
            FieldFillOutcome {
                field,
                applied: false,
                detail: Some(format!("未找到元素 {}", selector)),
            }
        }
        Err(e) => {
            warn!("⚠️ 字段 {} 写入失败: {}", field, e);
            FieldFillOutcome {
                field,
                applied: false,
                detail: Some(e.to_string()),
            }
        }
    }
}
