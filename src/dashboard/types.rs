//! Dashboard API 请求/响应类型

use serde::{Deserialize, Serialize};

use super::export::ExportFormat;
use super::format::{
    DisplayCategory, classify_suggestion, format_currency, format_latency, format_timestamp,
};
use super::model::{RequestRecord, Suggestion, SuggestionType};
use super::view::{SortDirection, SortField, ViewPage};

/// GET /requests 查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsQuery {
    pub page: Option<u32>,
}

/// PATCH /filters 请求体；缺省字段表示不修改
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersPatch {
    pub user_id: Option<String>,
    pub prompt: Option<String>,
}

/// PUT /sort 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortUpsertRequest {
    pub field: SortField,
    pub direction: SortDirection,
}

/// GET /export 查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub format: ExportFormat,
    pub page: Option<u32>,
}

/// PUT /settings 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPut {
    pub yaml: String,
}

/// 通用成功响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// 分页响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsPageResponse {
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub refresh_count: u64,
    pub records: Vec<RecordResponse>,
}

impl RequestsPageResponse {
    pub fn from_view(view: ViewPage, refresh_count: u64) -> Self {
        Self {
            total: view.total,
            page: view.page,
            page_size: view.page_size,
            total_pages: view.total_pages,
            refresh_count,
            records: view.records.iter().map(RecordResponse::from_record).collect(),
        }
    }
}

/// 单行响应：原始值 + 与表格一致的展示串
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: uuid::Uuid,
    pub user_id: String,
    pub prompt_request: String,
    pub submitted_prompt: String,
    pub model_name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub timestamp_display: String,
    pub estimated_cost_usd: f64,
    pub cost_display: String,
    pub estimated_latency_ms: f64,
    pub latency_display: String,
    pub quality_pct: u8,
    pub suggestion_type: SuggestionType,
    pub total_time_saved_ms: f64,
    pub time_saved_display: String,
    pub total_cost_saved_usd: f64,
    pub cost_saved_display: String,
    pub suggestions: Vec<SuggestionResponse>,
}

/// 抽屉里的建议子记录
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub text: String,
    pub new_cost_usd: f64,
    pub cost_display: String,
    pub new_latency_ms: f64,
    pub latency_display: String,
    pub new_quality_pct: u8,
    pub is_selected: bool,
    /// 展示类别，仅用于呈现
    pub category: DisplayCategory,
}

impl RecordResponse {
    pub fn from_record(record: &RequestRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id.clone(),
            prompt_request: record.prompt_request.clone(),
            submitted_prompt: record.submitted_prompt.clone(),
            model_name: record.model_name.clone(),
            timestamp: record.timestamp,
            timestamp_display: format_timestamp(&record.timestamp),
            estimated_cost_usd: record.estimated_cost_usd,
            cost_display: format_currency(record.estimated_cost_usd),
            estimated_latency_ms: record.estimated_latency_ms,
            latency_display: format_latency(record.estimated_latency_ms),
            quality_pct: record.quality_pct,
            suggestion_type: record.suggestion_type,
            total_time_saved_ms: record.total_time_saved_ms,
            time_saved_display: format_latency(record.total_time_saved_ms),
            total_cost_saved_usd: record.total_cost_saved_usd,
            cost_saved_display: format_currency(record.total_cost_saved_usd),
            suggestions: record
                .suggestions
                .iter()
                .map(|s| SuggestionResponse::from_suggestion(record, s))
                .collect(),
        }
    }
}

impl SuggestionResponse {
    fn from_suggestion(parent: &RequestRecord, s: &Suggestion) -> Self {
        Self {
            text: s.text.clone(),
            new_cost_usd: s.new_cost_usd,
            cost_display: format_currency(s.new_cost_usd),
            new_latency_ms: s.new_latency_ms,
            latency_display: format_latency(s.new_latency_ms),
            new_quality_pct: s.new_quality_pct,
            is_selected: s.is_selected,
            category: classify_suggestion(parent, s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::generate::generate_dataset;
    use chrono::TimeZone;

    #[test]
    fn test_record_response_carries_display_fields() {
        let now = chrono::Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
        let rows = generate_dataset(42, now);
        let resp = RecordResponse::from_record(&rows[0]);

        assert!(resp.cost_display.starts_with('$'));
        assert!(resp.latency_display.ends_with("ms") || resp.latency_display.ends_with('s'));
        assert_eq!(resp.suggestions.len(), 3);
        // 展示串与原始值同源
        assert_eq!(resp.cost_display, format_currency(rows[0].estimated_cost_usd));
    }
}
