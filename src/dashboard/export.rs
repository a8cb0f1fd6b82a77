//! 视图导出：把当前可见页序列化为可下载的 CSV 或 JSON 工件

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::{format_currency, format_latency, format_timestamp};
use super::model::RequestRecord;
use super::view::FilterSortState;

/// 导出文件名前缀
const FILENAME_PREFIX: &str = "taulayer-requests";

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// 生成的导出工件
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// JSON 导出的顶层文档
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    exported_at: DateTime<Utc>,
    filters: &'a FilterSortState,
    row_count: usize,
    rows: &'a [RequestRecord],
}

/// 导出当前可见行
///
/// CSV 写入真实行数据（表头 + 与表格一致的格式化值）；
/// JSON 为带导出时间与当前过滤条件的 pretty 文档。
pub fn export_view(
    format: ExportFormat,
    rows: &[RequestRecord],
    filters: &FilterSortState,
    now: DateTime<Utc>,
) -> anyhow::Result<ExportArtifact> {
    let body = match format {
        ExportFormat::Csv => build_csv(rows)?,
        ExportFormat::Json => build_json(rows, filters, now)?,
    };

    Ok(ExportArtifact {
        filename: export_filename(format, now),
        content_type: format.content_type(),
        body,
    })
}

/// 模板化前缀 + 时间戳后缀
pub fn export_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}.{}",
        FILENAME_PREFIX,
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

fn build_csv(rows: &[RequestRecord]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "userId",
        "promptRequest",
        "modelName",
        "timestamp",
        "estimatedCost",
        "estimatedLatency",
        "qualityPct",
        "suggestionType",
        "totalTimeSaved",
        "totalCostSaved",
    ])?;

    for row in rows {
        let suggestion_type = serde_json::to_value(row.suggestion_type)?
            .as_str()
            .unwrap_or("none")
            .to_string();
        writer.write_record([
            row.user_id.clone(),
            row.prompt_request.clone(),
            row.model_name.clone(),
            format_timestamp(&row.timestamp),
            format_currency(row.estimated_cost_usd),
            format_latency(row.estimated_latency_ms),
            row.quality_pct.to_string(),
            suggestion_type,
            format_latency(row.total_time_saved_ms),
            format_currency(row.total_cost_saved_usd),
        ])?;
    }

    writer
        .into_inner()
        .context("CSV 写入缓冲失败")
}

fn build_json(
    rows: &[RequestRecord],
    filters: &FilterSortState,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<u8>> {
    let doc = ExportDocument {
        exported_at: now,
        filters,
        row_count: rows.len(),
        rows,
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::generate::generate_dataset;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_filename_template() {
        assert_eq!(
            export_filename(ExportFormat::Csv, fixed_now()),
            "taulayer-requests-20260820-123045.csv"
        );
        assert_eq!(
            export_filename(ExportFormat::Json, fixed_now()),
            "taulayer-requests-20260820-123045.json"
        );
    }

    #[test]
    fn test_csv_contains_header_and_real_rows() {
        let rows = generate_dataset(42, fixed_now());
        let artifact =
            export_view(ExportFormat::Csv, &rows[..5], &FilterSortState::default(), fixed_now())
                .unwrap();
        let text = String::from_utf8(artifact.body).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6, "表头 + 5 行数据");
        assert!(lines[0].starts_with("userId,promptRequest,modelName"));
        // 行内容来自真实数据而不是占位符
        assert!(lines[1].contains(&rows[0].user_id));
        assert!(lines[1].contains('$'));
    }

    #[test]
    fn test_csv_empty_view_keeps_header() {
        let artifact =
            export_view(ExportFormat::Csv, &[], &FilterSortState::default(), fixed_now()).unwrap();
        let text = String::from_utf8(artifact.body).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_json_document_shape() {
        let rows = generate_dataset(42, fixed_now());
        let filters = FilterSortState {
            user_id_filter: "user_".to_string(),
            ..Default::default()
        };
        let artifact = export_view(ExportFormat::Json, &rows[..3], &filters, fixed_now()).unwrap();
        assert_eq!(artifact.content_type, "application/json");

        let doc: serde_json::Value = serde_json::from_slice(&artifact.body).unwrap();
        assert_eq!(doc["rowCount"], 3);
        assert_eq!(doc["filters"]["userIdFilter"], "user_");
        assert_eq!(doc["rows"].as_array().unwrap().len(), 3);
        assert!(doc["exportedAt"].as_str().unwrap().starts_with("2026-08-20"));
        // pretty 输出
        assert!(artifact.body.windows(2).any(|w| w == b"\n "));
    }
}
