//! EC 查询与抓取结果模型

use serde::{Deserialize, Serialize};

use crate::models::BoundaryResult;

/// 查询参数
///
/// 会话创建时填入，创建后不可变。四个字段均为可选：
/// 表单允许只预填部分参数，其余由人工在浏览器中补齐。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub district: Option<String>,
    pub sro: Option<String>,
    pub doc_number: Option<String>,
    pub year: Option<String>,
}

/// 一条抓取到的 EC 登记记录
///
/// 门户结果表中的一行。单元格可能缺失，因此所有字段均为可选。
/// 抓取后不可变。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcEntry {
    /// 登记文书编号
    pub doc_number: Option<String>,
    /// 登记日期（门户展示格式，通常为 DD-MM-YYYY）
    pub doc_date: Option<String>,
    /// 文书性质（抵押、买卖等）
    pub nature: Option<String>,
    /// 当事各方
    pub parties: Option<String>,
    /// 对价金额（原始文本）
    pub consideration: Option<String>,
    /// 产权描述文本，边界提取的输入
    pub schedule_text: Option<String>,
}

/// 解析后的记录：抓取行 + 四至边界 + 置信度
///
/// 不变式：每条进入持久化的记录都恰好携带一份边界结果，
/// 且该结果仅由其 schedule text 确定。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    #[serde(flatten)]
    pub entry: EcEntry,
    pub boundaries: BoundaryResult,
    /// 成功提取的方位占比（0.0-1.0，步长 0.25）
    pub confidence: f64,
}

/// 一次捕获对应的案件记录
#[derive(Debug, Clone)]
pub struct CaseRecord {
    pub user_id: String,
    /// 会话创建时的真实查询参数，随案件一并落库
    pub search_params: SearchParams,
}
