//! Auth API 处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::client::SessionState;
use super::flow::FlowOutcome;
use super::router::AuthState;
use super::types::{AuthErrorResponse, MagicLinkRequest, MagicLinkResponse};

/// POST /api/auth/magic-link
///
/// 登录对话框的提交入口；状态机与错误呈现在 [`SignInFlow`] 内
///
/// [`SignInFlow`]: super::flow::SignInFlow
pub async fn send_magic_link(
    State(state): State<AuthState>,
    Json(payload): Json<MagicLinkRequest>,
) -> impl IntoResponse {
    let redirect = payload
        .redirect_to
        .as_deref()
        .or(state.default_redirect.as_deref());

    match state.flow.submit(&payload.email, redirect).await {
        FlowOutcome::Sent => Json(MagicLinkResponse {
            success: true,
            message: "Magic link sent. Check your inbox.".to_string(),
        })
        .into_response(),
        FlowOutcome::Rejected(message) => {
            let not_invited = message == super::client::NOT_INVITED_MESSAGE;
            (
                StatusCode::BAD_REQUEST,
                Json(AuthErrorResponse {
                    error: message,
                    not_invited,
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/auth/session
pub async fn get_session(State(state): State<AuthState>) -> impl IntoResponse {
    Json(state.client.session())
}

/// POST /api/auth/session
///
/// 前端在提供方会话事件（登录/登出）时回传最新状态
pub async fn set_session(
    State(state): State<AuthState>,
    Json(payload): Json<SessionState>,
) -> impl IntoResponse {
    state.client.set_session(payload.clone());
    Json(payload)
}
