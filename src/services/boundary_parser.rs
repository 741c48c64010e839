//! 四至边界解析器 - 业务能力层
//!
//! 把非结构化的产权描述文本（schedule text）转换成四个方位的
//! 结构化边界，并给出置信度。纯函数，无任何副作用。
//!
//! 提取规则：对 North / South / East / West 四个方位标签分别做一次
//! 独立扫描（共四次），每次在整段规范化文本上定位"标签 + 分隔符"的
//! 首次出现，向后截取至任一其他方位标签出现处或文本末尾。四次扫描
//! 互相独立，因此原文中标签以任意顺序出现都能正确截取。
//!
//! 已知局限：其他方位的标签词出现在某个边界描述内部时会提前截断
//! （例如边界描述本身含有 "East" 字样）。这是刻意保留的行为，
//! 与门户数据的实际形态一致。

use regex::Regex;

use crate::models::{BoundaryResult, NOT_SPECIFIED};

/// 从产权描述文本中提取四至边界
///
/// 输入可能为空、空串或纯空白，此时直接返回全占位结果。
pub fn extract_boundaries(text: Option<&str>) -> BoundaryResult {
    let Some(raw) = text else {
        return BoundaryResult::default();
    };

    // 规范化：空白折叠为单个空格，去除首尾空白
    let normalized = normalize_whitespace(raw);
    if normalized.is_empty() {
        return BoundaryResult::default();
    }

    let not_specified = || NOT_SPECIFIED.to_string();

    BoundaryResult {
        north: capture_direction(&normalized, "north", &["south", "east", "west"])
            .unwrap_or_else(not_specified),
        south: capture_direction(&normalized, "south", &["north", "east", "west"])
            .unwrap_or_else(not_specified),
        east: capture_direction(&normalized, "east", &["north", "south", "west"])
            .unwrap_or_else(not_specified),
        west: capture_direction(&normalized, "west", &["north", "south", "east"])
            .unwrap_or_else(not_specified),
    }
}

/// 计算边界提取置信度
///
/// 成功提取的方位数除以 4，结果只可能是 {0, 0.25, 0.5, 0.75, 1.0}。
/// 纯函数，永不失败。
pub fn calculate_confidence(boundaries: &BoundaryResult) -> f64 {
    boundaries.specified_count() as f64 / 4.0
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 截取单个方位的边界描述
///
/// 定位"标签 + 分隔符（冒号、连字符或空白）"的首次出现，
/// 截取其后至任一其他标签出现处或文本末尾的内容。
fn capture_direction(text: &str, label: &str, others: &[&str]) -> Option<String> {
    let Ok(label_re) = Regex::new(&format!(r"(?i){}[:\-\s]+", label)) else {
        return None;
    };
    let matched = label_re.find(text)?;
    let tail = &text[matched.end()..];

    // 其他方位标签按纯子串匹配（不要求词边界），与门户文本的实际形态一致
    let Ok(stop_re) = Regex::new(&format!(r"(?i)(?:{})", others.join("|"))) else {
        return None;
    };
    let captured = match stop_re.find(tail) {
        Some(stop) => &tail[..stop.start()],
        None => tail,
    };

    clean_boundary_text(captured)
}

/// 清理截取到的边界文本
///
/// 去除首尾空白、行首的 "by" 噪声词以及行尾的标点串；
/// 清理后为空则视为未提取到。
fn clean_boundary_text(text: &str) -> Option<String> {
    let mut cleaned = text.trim();

    // "Bounded on the East by temple" 这类写法里 "by" 属于分隔噪声词
    if let Some(prefix) = cleaned.get(0..3) {
        if prefix.eq_ignore_ascii_case("by ") {
            cleaned = cleaned[3..].trim_start();
        }
    }

    let cleaned = cleaned.trim_end_matches([';', ',', '.']).trim_end();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_all_four_directions() {
        // 四个方位齐全、分隔符各不相同的典型文本
        let boundaries = extract_boundaries(Some(
            "North: Road; South- Plot 12, East Canal West: House No 5.",
        ));

        assert_eq!(boundaries.north, "Road");
        assert_eq!(boundaries.south, "Plot 12");
        assert_eq!(boundaries.east, "Canal");
        assert_eq!(boundaries.west, "House No 5");
        assert_eq!(calculate_confidence(&boundaries), 1.0);
    }

    #[test]
    fn test_single_direction_with_noise_word() {
        // 只出现一个方位，且带 "by" 噪声词
        let boundaries = extract_boundaries(Some("Bounded on the East by temple"));

        assert_eq!(boundaries.north, NOT_SPECIFIED);
        assert_eq!(boundaries.south, NOT_SPECIFIED);
        assert_eq!(boundaries.east, "temple");
        assert_eq!(boundaries.west, NOT_SPECIFIED);
        assert_eq!(calculate_confidence(&boundaries), 0.25);
    }

    #[test]
    fn test_directions_in_arbitrary_order() {
        // 标签顺序与 N/S/E/W 无关，四次独立扫描各取各的
        let boundaries = extract_boundaries(Some(
            "West: Temple land North: 40 ft Road East: Survey No 121 South: Vacant plot",
        ));

        assert_eq!(boundaries.north, "40 ft Road");
        assert_eq!(boundaries.south, "Vacant plot");
        assert_eq!(boundaries.east, "Survey No 121");
        assert_eq!(boundaries.west, "Temple land");
        assert_eq!(calculate_confidence(&boundaries), 1.0);
    }

    #[test]
    fn test_partial_directions_yield_partial_confidence() {
        let two = extract_boundaries(Some("North: Road South: Canal"));
        assert_eq!(two.north, "Road");
        assert_eq!(two.south, "Canal");
        assert_eq!(two.east, NOT_SPECIFIED);
        assert_eq!(two.west, NOT_SPECIFIED);
        assert_eq!(calculate_confidence(&two), 0.5);

        let three = extract_boundaries(Some("North: Road South: Canal East: Temple"));
        assert_eq!(calculate_confidence(&three), 0.75);

        let none = extract_boundaries(Some("Survey No 42, Extent 120 sq yds"));
        assert_eq!(none, BoundaryResult::default());
        assert_eq!(calculate_confidence(&none), 0.0);
    }

    #[test]
    fn test_null_and_empty_input() {
        assert_eq!(extract_boundaries(None), BoundaryResult::default());
        assert_eq!(extract_boundaries(Some("")), BoundaryResult::default());
        assert_eq!(extract_boundaries(Some("   \n\t  ")), BoundaryResult::default());
        assert_eq!(calculate_confidence(&extract_boundaries(None)), 0.0);
    }

    #[test]
    fn test_whitespace_normalization() {
        // 换行和连续空白折叠后不影响提取
        let boundaries = extract_boundaries(Some("North:\n   Road\t\t South:   Canal"));
        assert_eq!(boundaries.north, "Road");
        assert_eq!(boundaries.south, "Canal");
    }

    #[test]
    fn test_trailing_punctuation_stripped() {
        let boundaries = extract_boundaries(Some("North: Road;;; South: Canal,,. East: Temple."));
        assert_eq!(boundaries.north, "Road");
        assert_eq!(boundaries.south, "Canal");
        assert_eq!(boundaries.east, "Temple");
    }

    #[test]
    fn test_case_insensitive_labels() {
        let boundaries = extract_boundaries(Some("NORTH: Road south- Canal EaSt: Temple"));
        assert_eq!(boundaries.north, "Road");
        assert_eq!(boundaries.south, "Canal");
        assert_eq!(boundaries.east, "Temple");
    }

    #[test]
    fn test_repeated_label_uses_first_occurrence() {
        let boundaries = extract_boundaries(Some("North: Road South: Canal North: Temple"));
        // North 的首次出现生效；第二个 North 只是截断了 South 字段
        assert_eq!(boundaries.north, "Road");
        assert_eq!(boundaries.south, "Canal");
    }

    #[test]
    fn test_label_without_separator_is_skipped() {
        // "Northern" 不带分隔符，不应被当作 North 标签
        let boundaries = extract_boundaries(Some("Northernmost plot of Survey No 7"));
        assert_eq!(boundaries.north, NOT_SPECIFIED);
    }

    #[test]
    fn test_label_inside_other_field_truncates() {
        // 已知局限：标签词出现在别的字段内部会提前截断，保留该行为
        let boundaries = extract_boundaries(Some("North: Road to East Gate South: Canal"));
        assert_eq!(boundaries.north, "Road to");
        assert_eq!(boundaries.east, "Gate");
        assert_eq!(boundaries.south, "Canal");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = Some("North: Road; South- Plot 12, East Canal West: House No 5.");
        assert_eq!(extract_boundaries(text), extract_boundaries(text));
    }
}
