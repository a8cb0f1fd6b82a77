//! 演示数据集的数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 被采纳建议的类别；没有建议被采纳时为 `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Latency,
    Cost,
    Clarification,
    None,
}

/// 候选优化建议（随机生成，指标整体优于父记录基线）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// 建议描述
    pub text: String,
    /// 采纳后的预估成本（USD）
    pub new_cost_usd: f64,
    /// 采纳后的预估延迟（毫秒）
    pub new_latency_ms: f64,
    /// 采纳后的质量评分（0-100）
    pub new_quality_pct: u8,
    /// 是否被采纳；每条记录最多一条为 true
    pub is_selected: bool,
}

/// 模拟的用户请求记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub id: Uuid,
    /// 不透明用户标识，多条记录可能共享同一个
    pub user_id: String,
    /// 请求的短描述（表格列）
    pub prompt_request: String,
    /// 完整提交的 prompt（抽屉展示）
    pub submitted_prompt: String,
    /// 固定枚举集合中的模型标签
    pub model_name: String,
    /// 最近 7 天内的随机时间点
    pub timestamp: DateTime<Utc>,
    /// 基线预估成本（USD）
    pub estimated_cost_usd: f64,
    /// 基线预估延迟（毫秒）
    pub estimated_latency_ms: f64,
    /// 质量评分（0-100）
    pub quality_pct: u8,
    /// 固定 3 条候选建议
    pub suggestions: Vec<Suggestion>,
    pub suggestion_type: SuggestionType,
    /// 采纳建议节省的时间，未采纳时为 0
    pub total_time_saved_ms: f64,
    /// 采纳建议节省的成本，未采纳时为 0
    pub total_cost_saved_usd: f64,
}

impl RequestRecord {
    /// 当前被采纳的建议（如果有）
    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.is_selected)
    }
}
