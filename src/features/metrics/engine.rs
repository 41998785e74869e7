//! 统计聚合：纯函数，无 I/O。

use std::collections::BTreeMap;

use crate::features::github::models::{DayContribution, LanguageHistogram};

/// 最近活跃视图的固定窗口（天）
pub const RECENT_WINDOW_DAYS: usize = 7;

/// 单个语言的占比
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub count: u32,
    /// 百分比（0-100），截断到两位小数
    pub percentage: f64,
}

/// 截断到两位小数：先放大再向下取整，不做四舍五入。
///
/// 既有调用方依赖这一行为做结果比对，不可改为 round。
pub fn truncate_2dp(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// 按直方图计算各语言占比，保持直方图（上游首次出现）的顺序。
pub fn language_shares(hist: &LanguageHistogram) -> Vec<LanguageShare> {
    let total = hist.total();
    if total == 0 {
        return Vec::new();
    }
    hist.entries()
        .iter()
        .map(|(name, count)| LanguageShare {
            name: name.clone(),
            count: *count,
            percentage: truncate_2dp(f64::from(*count) / f64::from(total) * 100.0),
        })
        .collect()
}

/// 按占比降序排列；稳定排序，占比相同保持原顺序。
pub fn sort_by_share_desc(mut shares: Vec<LanguageShare>) -> Vec<LanguageShare> {
    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    shares
}

/// JSON 输出用的 `{语言: 百分比}` 映射
pub fn shares_as_map(shares: &[LanguageShare]) -> BTreeMap<String, f64> {
    shares
        .iter()
        .map(|s| (s.name.clone(), s.percentage))
        .collect()
}

/// 某难度的解题占比；题目总数为 0 时为 0。
pub fn difficulty_percent(solved: u32, total_questions: u32) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    f64::from(solved) / f64::from(total_questions) * 100.0
}

/// 取按日期升序序列的最后 `n` 项；不足 `n` 项时全部返回。
pub fn trailing_window(days: &[DayContribution], n: usize) -> &[DayContribution] {
    &days[days.len().saturating_sub(n)..]
}
