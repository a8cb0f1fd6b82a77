//! 视图变换：过滤 → 稳定多键排序 → 分页
//!
//! 全部为纯函数，不修改输入数据集。

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::model::{RequestRecord, SuggestionType};

/// 每页固定行数
pub const PAGE_SIZE: u32 = 25;

/// 可排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Timestamp,
    UserId,
    PromptRequest,
    ModelName,
    EstimatedCostUsd,
    EstimatedLatencyMs,
    QualityPct,
    SuggestionType,
    TotalTimeSavedMs,
    TotalCostSavedUsd,
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` ↔ `desc` 翻转
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// 单个排序键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

/// 共享的过滤/排序状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSortState {
    /// user_id 子串过滤（大小写不敏感），空串表示不过滤
    #[serde(default)]
    pub user_id_filter: String,
    /// 短描述子串过滤（大小写不敏感），空串表示不过滤
    #[serde(default)]
    pub prompt_filter: String,
    /// 按数组顺序依次比较的排序键
    #[serde(default)]
    pub sort_keys: Vec<SortKey>,
}

impl Default for FilterSortState {
    fn default() -> Self {
        Self {
            user_id_filter: String::new(),
            prompt_filter: String::new(),
            sort_keys: vec![SortKey {
                field: SortField::Timestamp,
                direction: SortDirection::Desc,
            }],
        }
    }
}

/// 一页视图结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPage {
    /// 过滤后的总行数
    pub total: usize,
    /// 实际使用的页号（最小为 1）
    pub page: u32,
    pub page_size: u32,
    /// ceil(total / page_size)
    pub total_pages: u32,
    pub records: Vec<RequestRecord>,
}

/// 应用完整的视图变换
///
/// 超出范围的页号返回空切片而不是错误；页号小于 1 时按 1 处理。
pub fn apply_view(
    records: &[RequestRecord],
    state: &FilterSortState,
    page: u32,
    page_size: u32,
) -> ViewPage {
    let page = page.max(1);
    let mut filtered: Vec<&RequestRecord> = records
        .iter()
        .filter(|r| matches_filters(r, state))
        .collect();

    // Vec::sort_by 是稳定排序，键相等时保留原有相对顺序
    filtered.sort_by(|a, b| compare_records(a, b, &state.sort_keys));

    let total = filtered.len();
    let total_pages = (total as u32).div_ceil(page_size);
    let start = ((page - 1) as usize).saturating_mul(page_size as usize);
    let rows = if start >= total {
        Vec::new()
    } else {
        filtered[start..(start + page_size as usize).min(total)]
            .iter()
            .map(|r| (*r).clone())
            .collect()
    };

    ViewPage {
        total,
        page,
        page_size,
        total_pages,
        records: rows,
    }
}

fn matches_filters(record: &RequestRecord, state: &FilterSortState) -> bool {
    contains_ci(&record.user_id, &state.user_id_filter)
        && contains_ci(&record.prompt_request, &state.prompt_filter)
}

/// 大小写不敏感的子串匹配；过滤串为空时恒为真
fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 按排序键数组逐键比较，平局落到下一个键
fn compare_records(a: &RequestRecord, b: &RequestRecord, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ord = compare_field(a, b, key.field);
        let ord = match key.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_field(a: &RequestRecord, b: &RequestRecord, field: SortField) -> Ordering {
    match field {
        SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortField::UserId => a.user_id.cmp(&b.user_id),
        SortField::PromptRequest => a.prompt_request.cmp(&b.prompt_request),
        SortField::ModelName => a.model_name.cmp(&b.model_name),
        SortField::EstimatedCostUsd => a.estimated_cost_usd.total_cmp(&b.estimated_cost_usd),
        SortField::EstimatedLatencyMs => a.estimated_latency_ms.total_cmp(&b.estimated_latency_ms),
        SortField::QualityPct => a.quality_pct.cmp(&b.quality_pct),
        SortField::SuggestionType => type_rank(a.suggestion_type).cmp(&type_rank(b.suggestion_type)),
        SortField::TotalTimeSavedMs => a.total_time_saved_ms.total_cmp(&b.total_time_saved_ms),
        SortField::TotalCostSavedUsd => a.total_cost_saved_usd.total_cmp(&b.total_cost_saved_usd),
    }
}

/// suggestionType 按词面（lexical）排序：clarification < cost < latency < none
fn type_rank(t: SuggestionType) -> u8 {
    match t {
        SuggestionType::Clarification => 0,
        SuggestionType::Cost => 1,
        SuggestionType::Latency => 2,
        SuggestionType::None => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::generate::generate_dataset;
    use chrono::{DateTime, TimeZone, Utc};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
    }

    fn dataset() -> Vec<crate::dashboard::model::RequestRecord> {
        generate_dataset(42, fixed_now())
    }

    fn state_with_keys(keys: Vec<SortKey>) -> FilterSortState {
        FilterSortState {
            user_id_filter: String::new(),
            prompt_filter: String::new(),
            sort_keys: keys,
        }
    }

    #[test]
    fn test_no_match_filter_yields_empty() {
        let rows = dataset();
        let state = FilterSortState {
            user_id_filter: "no-such-user".to_string(),
            ..Default::default()
        };
        let page = apply_view(&rows, &state, 1, PAGE_SIZE);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let rows = dataset();
        let needle = rows[0].user_id.to_uppercase();
        let state = FilterSortState {
            user_id_filter: needle,
            ..Default::default()
        };
        let page = apply_view(&rows, &state, 1, PAGE_SIZE);
        assert!(page.total > 0);
        assert!(page.records.iter().all(|r| r.user_id == rows[0].user_id));
    }

    #[test]
    fn test_prompt_filter_substring() {
        let rows = dataset();
        let state = FilterSortState {
            prompt_filter: "sql".to_string(),
            ..Default::default()
        };
        let page = apply_view(&rows, &state, 1, PAGE_SIZE);
        assert!(page
            .records
            .iter()
            .all(|r| r.prompt_request.to_lowercase().contains("sql")));
    }

    #[test]
    fn test_default_sort_timestamp_desc() {
        let rows = dataset();
        let page = apply_view(&rows, &FilterSortState::default(), 1, PAGE_SIZE);
        for pair in page.records.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn test_toggle_direction_reverses_order() {
        let rows = dataset();
        let desc = state_with_keys(vec![SortKey {
            field: SortField::Timestamp,
            direction: SortDirection::Desc,
        }]);
        let asc = state_with_keys(vec![SortKey {
            field: SortField::Timestamp,
            direction: SortDirection::Asc,
        }]);

        // 用足够大的页容纳全部行，整体比较顺序
        let d = apply_view(&rows, &desc, 1, 100);
        let a = apply_view(&rows, &asc, 1, 100);
        let mut reversed = d.records.clone();
        reversed.reverse();
        let ids: Vec<_> = reversed.iter().map(|r| r.id).collect();
        let asc_ids: Vec<_> = a.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, asc_ids);
    }

    #[test]
    fn test_multi_key_sort_falls_through_on_tie() {
        let rows = dataset();
        let state = state_with_keys(vec![
            SortKey {
                field: SortField::ModelName,
                direction: SortDirection::Asc,
            },
            SortKey {
                field: SortField::EstimatedCostUsd,
                direction: SortDirection::Desc,
            },
        ]);
        let page = apply_view(&rows, &state, 1, 100);
        for pair in page.records.windows(2) {
            let (x, y) = (&pair[0], &pair[1]);
            assert!(x.model_name <= y.model_name);
            if x.model_name == y.model_name {
                assert!(x.estimated_cost_usd >= y.estimated_cost_usd);
            }
        }
    }

    #[test]
    fn test_stable_sort_preserves_prior_order_on_equal_keys() {
        let rows = dataset();
        // 先按默认（时间倒序）取全量顺序
        let baseline = apply_view(&rows, &FilterSortState::default(), 1, 100);
        // 再对该顺序单按 model_name 排序；同名记录应保持原先的时间倒序
        let by_model = apply_view(
            &baseline.records,
            &state_with_keys(vec![SortKey {
                field: SortField::ModelName,
                direction: SortDirection::Asc,
            }]),
            1,
            100,
        );
        for pair in by_model.records.windows(2) {
            if pair[0].model_name == pair[1].model_name {
                assert!(pair[0].timestamp >= pair[1].timestamp);
            }
        }
    }

    #[test]
    fn test_pagination_counts_and_overflow() {
        let rows = dataset();
        let state = FilterSortState::default();
        let page1 = apply_view(&rows, &state, 1, PAGE_SIZE);
        assert_eq!(page1.total, 50);
        assert_eq!(page1.total_pages, 2);
        assert_eq!(page1.records.len(), 25);

        let page2 = apply_view(&rows, &state, 2, PAGE_SIZE);
        assert_eq!(page2.records.len(), 25);

        // 超出范围：返回空而不报错
        let page3 = apply_view(&rows, &state, 3, PAGE_SIZE);
        assert!(page3.records.is_empty());
        assert_eq!(page3.total_pages, 2);
    }

    #[test]
    fn test_page_clamped_to_one() {
        let rows = dataset();
        let page = apply_view(&rows, &FilterSortState::default(), 0, PAGE_SIZE);
        assert_eq!(page.page, 1);
        assert_eq!(page.records.len(), 25);
    }

    #[test]
    fn test_input_not_mutated() {
        let rows = dataset();
        let before = serde_json::to_string(&rows).unwrap();
        let _ = apply_view(
            &rows,
            &state_with_keys(vec![SortKey {
                field: SortField::EstimatedCostUsd,
                direction: SortDirection::Asc,
            }]),
            1,
            PAGE_SIZE,
        );
        assert_eq!(before, serde_json::to_string(&rows).unwrap());
    }
}
