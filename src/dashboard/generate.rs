//! 演示数据集生成器
//!
//! 接受显式种子（及基准时间），同一 (seed, now) 输入产出完全相同的
//! 数据集，便于单元测试与前端联调复现。

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::model::{RequestRecord, Suggestion, SuggestionType};
use crate::common::truncate_with_ellipsis;

/// 数据集固定行数
pub const DATASET_SIZE: usize = 50;

/// 每条记录的候选建议数
pub const SUGGESTIONS_PER_RECORD: usize = 3;

/// 表格短描述列的最大字节数
const PROMPT_PREVIEW_BYTES: usize = 56;

/// 固定的模型标签集合
const MODEL_NAMES: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "claude-sonnet-4",
    "gemini-2.0-flash",
    "llama-3.3-70b",
];

/// 模拟查询文本池
const PROMPTS: &[&str] = &[
    "Summarize the Q3 revenue report and highlight the three largest variances against forecast",
    "Generate SQL to find customers who churned within 30 days of their first support ticket",
    "Draft a follow-up email for enterprise leads who attended the webinar but did not book a demo",
    "Classify these 2,000 support tickets by root cause and urgency",
    "Compare our pricing page copy against the top three competitors and suggest improvements",
    "Extract action items and owners from this 90-minute all-hands transcript",
    "Translate the onboarding guide into Spanish, keeping product terms untranslated",
    "Forecast weekly active users for the next quarter given this usage CSV",
    "Rewrite this incident postmortem for an executive audience",
    "Rank these 40 feature requests by estimated revenue impact",
    "Detect anomalies in the daily API error-rate series for the last 60 days",
    "Build a one-paragraph answer about SOC 2 scope for the security questionnaire",
];

/// 候选建议文案池：靠前的词会命中抽屉里的关键词分类
const SUGGESTION_TEXTS: &[&str] = &[
    "Rephrase the prompt with a narrower scope to clarify the expected output",
    "Add explicit date and category filters to make the request more specific",
    "Route to a smaller model for a faster response on this query shape",
    "Enable response caching to cut repeat latency on near-identical prompts",
    "Batch this request with similar pending queries to reduce per-call cost",
    "Switch to a cheaper model tier; quality impact is minimal at this complexity",
    "Trim boilerplate context from the prompt before submission",
    "Run during off-peak hours for better throughput",
];

/// 生成固定行数的演示数据集
///
/// `now` 为时间窗口的右端点；时间戳均匀分布在其前 7 天内。
pub fn generate_dataset(seed: u64, now: DateTime<Utc>) -> Vec<RequestRecord> {
    let mut rng = fastrand::Rng::with_seed(seed);

    // 用户池远小于行数，保证多条记录共享同一 user_id
    let user_pool: Vec<String> = (0..18)
        .map(|_| format!("user_{:06x}", rng.u32(..0x0100_0000)))
        .collect();

    (0..DATASET_SIZE)
        .map(|_| generate_record(&mut rng, &user_pool, now))
        .collect()
}

fn generate_record(
    rng: &mut fastrand::Rng,
    user_pool: &[String],
    now: DateTime<Utc>,
) -> RequestRecord {
    let submitted_prompt = PROMPTS[rng.usize(..PROMPTS.len())].to_string();
    let prompt_request = truncate_with_ellipsis(&submitted_prompt, PROMPT_PREVIEW_BYTES);

    let estimated_cost_usd = 0.002 + rng.f64() * 0.6;
    let estimated_latency_ms = 150.0 + rng.f64() * 3850.0;

    let suggestions: Vec<Suggestion> = {
        let mut list: Vec<Suggestion> = (0..SUGGESTIONS_PER_RECORD)
            .map(|_| generate_suggestion(rng, estimated_cost_usd, estimated_latency_ms))
            .collect();
        // 约七成记录采纳其中一条建议
        if rng.f64() < 0.7 {
            let idx = rng.usize(..list.len());
            list[idx].is_selected = true;
        }
        list
    };

    let selected = suggestions.iter().find(|s| s.is_selected);
    let (suggestion_type, total_time_saved_ms, total_cost_saved_usd) = match selected {
        Some(s) => {
            let time_saved = (estimated_latency_ms - s.new_latency_ms).max(0.0);
            let cost_saved = (estimated_cost_usd - s.new_cost_usd).max(0.0);
            (derive_type(rng, time_saved, cost_saved, estimated_latency_ms, estimated_cost_usd), time_saved, cost_saved)
        }
        None => (SuggestionType::None, 0.0, 0.0),
    };

    RequestRecord {
        id: Uuid::from_u64_pair(rng.u64(..), rng.u64(..)),
        user_id: user_pool[rng.usize(..user_pool.len())].clone(),
        prompt_request,
        submitted_prompt,
        model_name: MODEL_NAMES[rng.usize(..MODEL_NAMES.len())].to_string(),
        timestamp: now - Duration::seconds(rng.i64(0..7 * 24 * 3600)),
        estimated_cost_usd,
        estimated_latency_ms,
        quality_pct: rng.u8(..=100),
        suggestions,
        suggestion_type,
        total_time_saved_ms,
        total_cost_saved_usd,
    }
}

fn generate_suggestion(rng: &mut fastrand::Rng, base_cost: f64, base_latency: f64) -> Suggestion {
    Suggestion {
        text: SUGGESTION_TEXTS[rng.usize(..SUGGESTION_TEXTS.len())].to_string(),
        // 偏向优于基线：系数 0.35 ~ 0.95
        new_cost_usd: base_cost * (0.35 + rng.f64() * 0.6),
        new_latency_ms: base_latency * (0.35 + rng.f64() * 0.6),
        new_quality_pct: rng.u8(..=100),
        is_selected: false,
    }
}

/// 根据节省幅度推导采纳建议的类别；少数情况归为澄清类
fn derive_type(
    rng: &mut fastrand::Rng,
    time_saved: f64,
    cost_saved: f64,
    base_latency: f64,
    base_cost: f64,
) -> SuggestionType {
    if rng.f64() < 0.2 {
        return SuggestionType::Clarification;
    }
    let time_frac = if base_latency > 0.0 { time_saved / base_latency } else { 0.0 };
    let cost_frac = if base_cost > 0.0 { cost_saved / base_cost } else { 0.0 };
    if time_frac >= cost_frac {
        SuggestionType::Latency
    } else {
        SuggestionType::Cost
    }
}
