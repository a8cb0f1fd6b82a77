//! 认证对话框状态机
//!
//! 每个对话框的生命周期：`Idle → Submitting → (成功: 重置 | 失败:
//! 回到 Idle 并暴露错误)`。失败只通过 toast 呈现一次，不自动重试。

use std::sync::Arc;

use parking_lot::RwLock;

use crate::common::is_valid_email;
use crate::notify::{ToastBus, ToastLevel};

use super::client::IdentityClient;

/// 对话框阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    Idle,
    Submitting,
}

/// 一次提交的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// 魔法链接已发出，对话框可关闭/重置
    Sent,
    /// 被拒绝；携带面向用户的提示
    Rejected(String),
}

/// 登录对话框流程
pub struct SignInFlow {
    client: Arc<IdentityClient>,
    toasts: ToastBus,
    phase: RwLock<DialogPhase>,
    last_error: RwLock<Option<String>>,
}

impl SignInFlow {
    pub fn new(client: Arc<IdentityClient>, toasts: ToastBus) -> Self {
        Self {
            client,
            toasts,
            phase: RwLock::new(DialogPhase::Idle),
            last_error: RwLock::new(None),
        }
    }

    pub fn phase(&self) -> DialogPhase {
        *self.phase.read()
    }

    /// 上一次失败的用户提示（成功或重新提交时清除）
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// 提交邮箱，请求魔法链接
    ///
    /// 非法邮箱在任何网络调用之前就被拦下；提交中的重复请求直接拒绝。
    pub async fn submit(&self, email: &str, redirect_to: Option<&str>) -> FlowOutcome {
        if !is_valid_email(email) {
            let message = "Please enter a valid email address.".to_string();
            self.toasts.publish(ToastLevel::Error, message.clone());
            *self.last_error.write() = Some(message.clone());
            return FlowOutcome::Rejected(message);
        }

        {
            let mut phase = self.phase.write();
            if *phase == DialogPhase::Submitting {
                return FlowOutcome::Rejected("A sign-in request is already in flight.".to_string());
            }
            *phase = DialogPhase::Submitting;
        }
        *self.last_error.write() = None;

        let result = self.client.send_magic_link(email, redirect_to).await;
        *self.phase.write() = DialogPhase::Idle;

        match result {
            Ok(()) => {
                self.toasts
                    .publish(ToastLevel::Success, "Magic link sent. Check your inbox.");
                FlowOutcome::Sent
            }
            Err(e) => {
                let message = e.user_message();
                self.toasts.publish(ToastLevel::Error, message.clone());
                *self.last_error.write() = Some(message.clone());
                FlowOutcome::Rejected(message)
            }
        }
    }
}

/// 注册表单（提交到 /send 中继之前在客户端侧校验）
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub use_case: Option<String>,
}

impl SignUpForm {
    /// 校验必填字段；返回全部问题而不是第一个
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        if self.full_name.trim().is_empty() {
            problems.push("Full name is required.".to_string());
        }
        if !is_valid_email(&self.email) {
            problems.push("A valid email address is required.".to_string());
        }
        if problems.is_empty() { Ok(()) } else { Err(problems) }
    }
}
