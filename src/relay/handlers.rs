//! 中继端点处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::auth::flow::SignUpForm;

use super::email::build_signup_email;
use super::router::RelayState;
use super::types::{SendErrorResponse, SendSuccessResponse, SignupPayload};

/// GET /
///
/// 健康检查，返回静态文本
pub async fn health() -> &'static str {
    "TauLayer relay is running"
}

/// POST /send
///
/// 校验注册表单，构建 HTML 邮件并单次投递给邮件服务商。
/// 校验失败返回 400 并列出全部问题；服务商错误与意外失败
/// 统一返回泛化的 500 响应。
pub async fn send_signup(
    State(state): State<RelayState>,
    Json(payload): Json<SignupPayload>,
) -> impl IntoResponse {
    let form = SignUpForm {
        full_name: payload.full_name.clone(),
        email: payload.email.clone(),
        company_name: payload.company_name.clone(),
        role: payload.role.clone(),
        use_case: payload.use_case.clone(),
    };
    if let Err(problems) = form.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SendErrorResponse {
                error: problems.join(" "),
            }),
        )
            .into_response();
    }

    let (subject, html) = build_signup_email(&payload);

    match state.sender.send(&subject, &html).await {
        Ok(()) => Json(SendSuccessResponse {
            message: "Message sent successfully".to_string(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("注册邮件投递失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendErrorResponse {
                    error: "Failed to send message. Please try again later.".to_string(),
                }),
            )
                .into_response()
        }
    }
}
