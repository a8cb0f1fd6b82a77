//! 中继端点路由

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use super::email::EmailSender;
use super::handlers::{health, send_signup};

/// 中继端点状态
#[derive(Clone)]
pub struct RelayState {
    pub sender: Arc<EmailSender>,
}

/// 创建中继路由（挂载在应用根部）
pub fn create_relay_router(sender: Arc<EmailSender>) -> Router {
    let state = RelayState { sender };

    Router::new()
        .route("/", get(health))
        .route("/send", post(send_signup))
        .with_state(state)
}
