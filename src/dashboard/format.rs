//! 表格/抽屉的展示格式化
//!
//! 输出必须与前端显示层逐字符一致，导出文件复用同一套规则。

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::model::{RequestRecord, Suggestion};

/// 金额展示
///
/// 低于 0.01 美元保留 3 位小数，否则 2 位小数（十进制半进位）。
pub fn format_currency(value: f64) -> String {
    if value < 0.01 {
        format!("${:.3}", value)
    } else {
        format!("${:.2}", round_half_up(value, 2))
    }
}

/// 延迟展示
///
/// 低于 1000ms 按整数毫秒，否则转换为保留 1 位小数的秒。
pub fn format_latency(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{} ms", ms.round() as i64)
    } else {
        format!("{:.1} s", ms / 1000.0)
    }
}

/// 时间戳展示：`MM/DD/YYYY, HH:mm:ss`（24 小时制）
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%m/%d/%Y, %H:%M:%S").to_string()
}

/// 十进制半进位舍入
///
/// `{:.2}` 对二进制浮点做银行家式处理（0.015 会得到 0.01），
/// 这里加一个极小的补偿量来复现显示层的十进制行为。
fn round_half_up(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5 + 1e-9).floor() / factor
}

/// 抽屉里建议的展示类别（仅用于呈现，不影响排序或存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayCategory {
    Clarity,
    Speed,
    Cost,
    Quality,
}

/// 建议分类：先看文案关键词，再比较时间/成本节省的相对幅度，
/// 都不适用时归入 quality
pub fn classify_suggestion(parent: &RequestRecord, suggestion: &Suggestion) -> DisplayCategory {
    let text = suggestion.text.to_lowercase();

    const CLARITY_WORDS: &[&str] = &["clarif", "rephras", "specific", "scope", "narrow"];
    const SPEED_WORDS: &[&str] = &["faster", "speed", "latency", "cach", "off-peak"];
    const COST_WORDS: &[&str] = &["cost", "cheap", "batch", "budget"];

    if CLARITY_WORDS.iter().any(|w| text.contains(w)) {
        return DisplayCategory::Clarity;
    }
    if SPEED_WORDS.iter().any(|w| text.contains(w)) {
        return DisplayCategory::Speed;
    }
    if COST_WORDS.iter().any(|w| text.contains(w)) {
        return DisplayCategory::Cost;
    }

    let time_frac = if parent.estimated_latency_ms > 0.0 {
        (parent.estimated_latency_ms - suggestion.new_latency_ms) / parent.estimated_latency_ms
    } else {
        0.0
    };
    let cost_frac = if parent.estimated_cost_usd > 0.0 {
        (parent.estimated_cost_usd - suggestion.new_cost_usd) / parent.estimated_cost_usd
    } else {
        0.0
    };

    if time_frac <= 0.0 && cost_frac <= 0.0 {
        DisplayCategory::Quality
    } else if time_frac > cost_frac {
        DisplayCategory::Speed
    } else {
        DisplayCategory::Cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::SuggestionType;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn record(cost: f64, latency: f64) -> RequestRecord {
        RequestRecord {
            id: Uuid::nil(),
            user_id: "user_000001".to_string(),
            prompt_request: "p".to_string(),
            submitted_prompt: "p".to_string(),
            model_name: "gpt-4o".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap(),
            estimated_cost_usd: cost,
            estimated_latency_ms: latency,
            quality_pct: 80,
            suggestions: vec![],
            suggestion_type: SuggestionType::None,
            total_time_saved_ms: 0.0,
            total_cost_saved_usd: 0.0,
        }
    }

    fn suggestion(text: &str, cost: f64, latency: f64) -> Suggestion {
        Suggestion {
            text: text.to_string(),
            new_cost_usd: cost,
            new_latency_ms: latency,
            new_quality_pct: 90,
            is_selected: false,
        }
    }

    #[test]
    fn test_currency_under_one_cent_gets_three_places() {
        assert_eq!(format_currency(0.005), "$0.005");
        assert_eq!(format_currency(0.0099), "$0.010");
    }

    #[test]
    fn test_currency_two_places_rounds_half_up() {
        assert_eq!(format_currency(0.015), "$0.02");
        assert_eq!(format_currency(0.014), "$0.01");
        assert_eq!(format_currency(1.0), "$1.00");
        assert_eq!(format_currency(0.345), "$0.35");
    }

    #[test]
    fn test_latency_formatting() {
        assert_eq!(format_latency(999.0), "999 ms");
        assert_eq!(format_latency(0.0), "0 ms");
        assert_eq!(format_latency(1500.0), "1.5 s");
        assert_eq!(format_latency(1000.0), "1.0 s");
        assert_eq!(format_latency(12340.0), "12.3 s");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 3, 23, 5, 9).unwrap();
        assert_eq!(format_timestamp(&ts), "08/03/2026, 23:05:09");
    }

    #[test]
    fn test_keyword_classification_wins_first() {
        let parent = record(0.1, 1000.0);
        assert_eq!(
            classify_suggestion(&parent, &suggestion("Rephrase with a narrower scope", 0.09, 900.0)),
            DisplayCategory::Clarity
        );
        assert_eq!(
            classify_suggestion(&parent, &suggestion("Enable caching for this query", 0.05, 400.0)),
            DisplayCategory::Speed
        );
        assert_eq!(
            classify_suggestion(&parent, &suggestion("Batch similar requests together", 0.05, 400.0)),
            DisplayCategory::Cost
        );
    }

    #[test]
    fn test_relative_savings_fallback() {
        let parent = record(0.1, 1000.0);
        // 无关键词：时间节省 60% > 成本节省 10% → speed
        assert_eq!(
            classify_suggestion(&parent, &suggestion("Alternative plan", 0.09, 400.0)),
            DisplayCategory::Speed
        );
        // 成本节省占优 → cost（文案避开关键词）
        assert_eq!(
            classify_suggestion(&parent, &suggestion("Alternative plan", 0.04, 950.0)),
            DisplayCategory::Cost
        );
    }

    #[test]
    fn test_quality_fallback_when_no_savings() {
        let parent = record(0.1, 1000.0);
        assert_eq!(
            classify_suggestion(&parent, &suggestion("Alternative plan", 0.12, 1100.0)),
            DisplayCategory::Quality
        );
    }
}
