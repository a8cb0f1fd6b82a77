//! Dashboard API 处理器

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use chrono::Utc;

use super::router::DashboardState;
use super::types::{
    ExportQuery, FiltersPatch, RequestsPageResponse, RequestsQuery, SettingsPut, SortUpsertRequest,
    SuccessResponse,
};
use super::view::{PAGE_SIZE, SortField, apply_view};

/// GET /api/dashboard/requests
pub async fn get_requests(
    State(state): State<DashboardState>,
    Query(query): Query<RequestsQuery>,
) -> impl IntoResponse {
    let filter_state = state.controller.state();
    let generation = state.controller.refresh_count();
    let rows = state.store.dataset(generation);
    let view = apply_view(&rows, &filter_state, query.page.unwrap_or(1), PAGE_SIZE);
    Json(RequestsPageResponse::from_view(view, generation))
}

/// PATCH /api/dashboard/filters
///
/// 每个字段独立防抖提交；本端点立即返回，提交在防抖窗口后生效
pub async fn patch_filters(
    State(state): State<DashboardState>,
    Json(payload): Json<FiltersPatch>,
) -> impl IntoResponse {
    if let Some(user_id) = payload.user_id {
        state.controller.set_user_id_filter(user_id);
    }
    if let Some(prompt) = payload.prompt {
        state.controller.set_prompt_filter(prompt);
    }
    Json(SuccessResponse::new("Filter update scheduled"))
}

/// PUT /api/dashboard/sort
pub async fn upsert_sort(
    State(state): State<DashboardState>,
    Json(payload): Json<SortUpsertRequest>,
) -> impl IntoResponse {
    state.controller.upsert_sort_key(payload.field, payload.direction);
    Json(SuccessResponse::new("Sort key updated"))
}

/// DELETE /api/dashboard/sort/{field}
pub async fn remove_sort(
    State(state): State<DashboardState>,
    Path(field): Path<String>,
) -> impl IntoResponse {
    match parse_sort_field(&field) {
        Some(field) => {
            state.controller.remove_sort_key(field);
            Json(SuccessResponse::new("Sort key removed")).into_response()
        }
        None => invalid_field_response(&field),
    }
}

/// POST /api/dashboard/sort/{field}/toggle
pub async fn toggle_sort(
    State(state): State<DashboardState>,
    Path(field): Path<String>,
) -> impl IntoResponse {
    let Some(parsed) = parse_sort_field(&field) else {
        return invalid_field_response(&field);
    };
    if state.controller.toggle_sort_key(parsed) {
        Json(SuccessResponse::new("Sort direction toggled")).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": {"type": "not_found_error", "message": format!("Sort key not active: {}", field)}
            })),
        )
            .into_response()
    }
}

/// POST /api/dashboard/refresh
pub async fn refresh(State(state): State<DashboardState>) -> impl IntoResponse {
    let count = state.controller.refresh();
    Json(serde_json::json!({ "success": true, "refreshCount": count }))
}

/// GET /api/dashboard/export
///
/// 导出当前可见页，响应带 Content-Disposition 触发浏览器下载
pub async fn export(
    State(state): State<DashboardState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let filter_state = state.controller.state();
    let generation = state.controller.refresh_count();
    let rows = state.store.dataset(generation);
    let view = apply_view(&rows, &filter_state, query.page.unwrap_or(1), PAGE_SIZE);

    match super::export::export_view(query.format, &view.records, &filter_state, Utc::now()) {
        Ok(artifact) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.filename),
                ),
            ],
            artifact.body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("导出视图失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": {"type": "internal_error", "message": "Export failed"}
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/dashboard/settings
pub async fn get_settings(State(state): State<DashboardState>) -> impl IntoResponse {
    match state.settings.load() {
        Ok(saved) => Json(serde_json::json!({ "settings": saved })).into_response(),
        Err(e) => {
            tracing::error!("读取设置失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": {"type": "internal_error", "message": "Failed to load settings"}
                })),
            )
                .into_response()
        }
    }
}

/// PUT /api/dashboard/settings
pub async fn put_settings(
    State(state): State<DashboardState>,
    Json(payload): Json<SettingsPut>,
) -> impl IntoResponse {
    match state.settings.save(payload.yaml) {
        Ok(saved) => Json(serde_json::json!({ "success": true, "settings": saved })).into_response(),
        Err(e) => {
            tracing::error!("保存设置失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": {"type": "internal_error", "message": "Failed to save settings"}
                })),
            )
                .into_response()
        }
    }
}

/// 把路径参数解析成排序字段（camelCase 字段名）
fn parse_sort_field(raw: &str) -> Option<SortField> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

fn invalid_field_response(raw: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": {"type": "invalid_request_error", "message": format!("Unknown sort field: {}", raw)}
        })),
    )
        .into_response()
}
