//! 中继端点请求/响应类型

use serde::{Deserialize, Serialize};

/// POST /send 请求体（营销站注册表单）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
}

/// 成功响应：`200 { message }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSuccessResponse {
    pub message: String,
}

/// 失败响应：`500 { error }`（统一的泛化文案）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendErrorResponse {
    pub error: String,
}
