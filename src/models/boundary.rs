//! 四至边界结果模型
//!
//! 从产权描述文本（schedule text）中提取出的四个方位边界。

use serde::{Deserialize, Serialize};

/// 未能提取到边界时的占位值
pub const NOT_SPECIFIED: &str = "Not specified";

/// 四至边界提取结果
///
/// 每个字段要么是提取到的边界描述，要么是占位值 [`NOT_SPECIFIED`]。
/// 由解析器根据 schedule text 确定性地计算得出，计算后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryResult {
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
}

impl Default for BoundaryResult {
    fn default() -> Self {
        Self {
            north: NOT_SPECIFIED.to_string(),
            south: NOT_SPECIFIED.to_string(),
            east: NOT_SPECIFIED.to_string(),
            west: NOT_SPECIFIED.to_string(),
        }
    }
}

impl BoundaryResult {
    /// 已成功提取的方位数量（0-4）
    pub fn specified_count(&self) -> usize {
        [&self.north, &self.south, &self.east, &self.west]
            .iter()
            .filter(|v| v.as_str() != NOT_SPECIFIED)
            .count()
    }
}
