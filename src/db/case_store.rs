//! 案件写入
//!
//! 一次捕获落库为：一条案件 + N 条记录 + 每条记录一份边界结果，
//! 全部在同一个事务内完成。事务中途失败即整体回滚，部分写入的
//! 记录绝不可见。

use chrono::{NaiveDate, Utc};
use rusqlite::params;

use crate::db::Database;
use crate::error::AppResult;
use crate::models::{CaseRecord, ParsedEntry};

impl Database {
    /// 保存一个案件及其全部解析结果，返回案件 id
    ///
    /// 案件行记录会话创建时的真实查询参数（district / sro 单列冗余，
    /// 完整参数以 JSON 存档）。
    pub async fn save_case(&self, case: &CaseRecord, entries: &[ParsedEntry]) -> AppResult<i64> {
        let case = case.clone();
        let entries = entries.to_vec();

        self.execute(move |conn| {
            let search_params_json = serde_json::to_string(&case.search_params)?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO property_cases (user_id, district, sro, search_params, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    case.user_id,
                    case.search_params.district,
                    case.search_params.sro,
                    search_params_json,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            let case_id = tx.last_insert_rowid();

            for parsed in &entries {
                tx.execute(
                    "INSERT INTO ec_entries
                         (case_id, doc_number, reg_date, nature_of_doc, parties,
                          consideration, schedule_text)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        case_id,
                        parsed.entry.doc_number,
                        normalize_reg_date(parsed.entry.doc_date.as_deref()),
                        parsed.entry.nature,
                        parsed.entry.parties,
                        parse_consideration(parsed.entry.consideration.as_deref()),
                        parsed.entry.schedule_text,
                    ],
                )?;
                let entry_id = tx.last_insert_rowid();

                tx.execute(
                    "INSERT INTO boundary_versions
                         (ec_entry_id, north_text, south_text, east_text, west_text,
                          extraction_confidence)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        entry_id,
                        parsed.boundaries.north,
                        parsed.boundaries.south,
                        parsed.boundaries.east,
                        parsed.boundaries.west,
                        parsed.confidence,
                    ],
                )?;
            }

            tx.commit()?;
            Ok(case_id)
        })
        .await
    }
}

/// 门户日期为 DD-MM-YYYY，落库统一成 ISO 格式；解析失败存 NULL
fn normalize_reg_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    NaiveDate::parse_from_str(raw, "%d-%m-%Y")
        .ok()
        .map(|date| date.to_string())
}

/// 对价金额按数字解析，无法解析时记 0
fn parse_consideration(raw: Option<&str>) -> f64 {
    raw.and_then(|v| v.trim().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}
