//! 身份提供方客户端
//!
//! 只消费托管认证服务的边界能力：一次性登录链接（魔法链接）的
//! 签发，以及会话变更的订阅。服务本身由外部提供方实现。

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// 未受邀邮箱的定制提示
pub const NOT_INVITED_MESSAGE: &str =
    "This email hasn't been invited to the beta yet. Request access with the sign-up form.";

/// 认证边界错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// 提供方拒绝：该邮箱未被邀请（注册被关闭）
    NotInvited,
    /// 提供方返回的其他错误，携带其原始消息
    Provider(String),
    /// 网络层失败
    Network(String),
}

impl AuthError {
    /// 面向用户的提示文案
    pub fn user_message(&self) -> String {
        match self {
            Self::NotInvited => NOT_INVITED_MESSAGE.to_string(),
            Self::Provider(msg) => msg.clone(),
            Self::Network(_) => "Unable to reach the sign-in service. Please try again.".to_string(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInvited => write!(f, "email not invited"),
            Self::Provider(msg) => write!(f, "provider error: {}", msg),
            Self::Network(msg) => write!(f, "network error: {}", msg),
        }
    }
}

/// 当前会话状态（由前端在提供方会话变化时回传）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum SessionState {
    SignedOut,
    SignedIn { email: String },
}

/// 魔法链接签发请求体（提供方 OTP 端点格式）
#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    /// 登录专用：不允许借此创建新账号
    create_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OtpOptions<'a>>,
}

#[derive(Debug, Serialize)]
struct OtpOptions<'a> {
    email_redirect_to: &'a str,
}

/// 提供方错误响应的常见字段（不同版本字段名不同，全部兼容）
#[derive(Debug, Deserialize, Default)]
struct ProviderError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ProviderError {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

/// 身份提供方客户端
pub struct IdentityClient {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
    session_tx: watch::Sender<SessionState>,
}

impl IdentityClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>, client: reqwest::Client) -> Self {
        let (session_tx, _) = watch::channel(SessionState::SignedOut);
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            client,
            session_tx,
        }
    }

    /// 签发一次性登录链接
    ///
    /// `create_user = false`：未受邀邮箱不会被顺带注册，提供方会
    /// 返回 signups-not-allowed 一类的错误，由 [`map_provider_message`]
    /// 归并为 [`AuthError::NotInvited`]。
    pub async fn send_magic_link(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        let body = OtpRequest {
            email,
            create_user: false,
            options: redirect_to.map(|url| OtpOptions {
                email_redirect_to: url,
            }),
        };

        let resp = self
            .client
            .post(format!("{}/auth/v1/otp", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if resp.status().is_success() {
            tracing::info!("魔法链接已签发");
            return Ok(());
        }

        let status = resp.status();
        let message = resp
            .json::<ProviderError>()
            .await
            .ok()
            .and_then(ProviderError::into_message)
            .unwrap_or_else(|| format!("Sign-in failed (HTTP {})", status));
        tracing::warn!("魔法链接签发被拒绝: HTTP {} - {}", status, message);
        Err(map_provider_message(message))
    }

    /// 当前会话状态
    pub fn session(&self) -> SessionState {
        self.session_tx.borrow().clone()
    }

    /// 回写会话变更（前端在提供方会话事件时调用）
    pub fn set_session(&self, state: SessionState) {
        // 无订阅者时 send 失败，borrow 仍会更新
        let _ = self.session_tx.send(state);
    }

    /// 订阅会话变更，用于门禁受保护视图
    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.session_tx.subscribe()
    }
}

/// 把提供方错误消息归类
pub fn map_provider_message(message: String) -> AuthError {
    let lower = message.to_lowercase();
    if lower.contains("signups not allowed") || lower.contains("not invited") {
        AuthError::NotInvited
    } else {
        AuthError::Provider(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_not_invited_variants() {
        assert_eq!(
            map_provider_message("Signups not allowed for otp".to_string()),
            AuthError::NotInvited
        );
        assert_eq!(
            map_provider_message("This address was not invited".to_string()),
            AuthError::NotInvited
        );
    }

    #[test]
    fn test_map_other_errors_pass_through() {
        let err = map_provider_message("For security purposes, you can only request this once every 60 seconds".to_string());
        match err {
            AuthError::Provider(msg) => assert!(msg.contains("60 seconds")),
            other => panic!("期望 Provider 错误，得到 {:?}", other),
        }
    }

    #[test]
    fn test_not_invited_user_message_is_tailored() {
        assert_eq!(AuthError::NotInvited.user_message(), NOT_INVITED_MESSAGE);
        // 网络错误不向用户透出底层细节
        assert!(!AuthError::Network("dns failure".to_string())
            .user_message()
            .contains("dns"));
    }

    #[tokio::test]
    async fn test_session_watch_round_trip() {
        let client = IdentityClient::new(
            "https://demo.supabase.co/",
            "anon",
            reqwest::Client::new(),
        );
        assert_eq!(client.session(), SessionState::SignedOut);

        let mut rx = client.subscribe_session();
        client.set_session(SessionState::SignedIn {
            email: "a@b.co".to_string(),
        });

        rx.changed().await.unwrap();
        assert_eq!(
            *rx.borrow(),
            SessionState::SignedIn {
                email: "a@b.co".to_string()
            }
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = IdentityClient::new(
            "https://demo.supabase.co/",
            "anon",
            reqwest::Client::new(),
        );
        assert_eq!(client.base_url, "https://demo.supabase.co");
    }
}
