//! Auth API 请求/响应类型

use serde::{Deserialize, Serialize};

/// POST /api/auth/magic-link 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkRequest {
    pub email: String,
    /// 未提供时回退到配置的默认回跳地址
    pub redirect_to: Option<String>,
}

/// 魔法链接签发成功响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkResponse {
    pub success: bool,
    pub message: String,
}

/// 认证错误响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthErrorResponse {
    pub error: String,
    /// 是否为"未受邀"的定制分支（前端据此切换到注册引导）
    pub not_invited: bool,
}
