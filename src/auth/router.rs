//! Auth API 路由

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use super::client::IdentityClient;
use super::flow::SignInFlow;
use super::handlers::{get_session, send_magic_link, set_session};

/// Auth API 状态
#[derive(Clone)]
pub struct AuthState {
    pub client: Arc<IdentityClient>,
    pub flow: Arc<SignInFlow>,
    /// 配置的默认魔法链接回跳地址
    pub default_redirect: Option<String>,
}

/// 创建 Auth API 路由
pub fn create_auth_router(
    client: Arc<IdentityClient>,
    flow: Arc<SignInFlow>,
    default_redirect: Option<String>,
) -> Router {
    let state = AuthState {
        client,
        flow,
        default_redirect,
    };

    Router::new()
        .route("/magic-link", post(send_magic_link))
        .route("/session", get(get_session).post(set_session))
        .with_state(state)
}
