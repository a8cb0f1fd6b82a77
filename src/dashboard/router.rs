//! Dashboard API 路由

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::settings::SettingsStore;

use super::controller::FilterController;
use super::handlers::{
    export, get_requests, get_settings, patch_filters, put_settings, refresh, remove_sort,
    toggle_sort, upsert_sort,
};
use super::store::DashboardStore;

/// Dashboard API 状态
#[derive(Clone)]
pub struct DashboardState {
    pub controller: Arc<FilterController>,
    pub store: Arc<DashboardStore>,
    pub settings: Arc<SettingsStore>,
}

/// 创建 Dashboard API 路由
///
/// 返回 Router<()>，可直接 nest 到主应用
pub fn create_dashboard_router(
    controller: Arc<FilterController>,
    store: Arc<DashboardStore>,
    settings: Arc<SettingsStore>,
) -> Router {
    let state = DashboardState {
        controller,
        store,
        settings,
    };

    Router::new()
        .route("/requests", get(get_requests))
        .route("/filters", patch(patch_filters))
        .route("/sort", put(upsert_sort))
        .route("/sort/{field}", axum::routing::delete(remove_sort))
        .route("/sort/{field}/toggle", post(toggle_sort))
        .route("/refresh", post(refresh))
        .route("/export", get(export))
        .route("/settings", get(get_settings).put(put_settings))
        .with_state(state)
}
