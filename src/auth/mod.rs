//! 认证模块
//!
//! 托管身份提供方的消费侧：魔法链接签发、对话框状态机、会话订阅

pub mod client;
pub mod flow;
mod handlers;
mod router;
mod types;

pub use client::IdentityClient;
pub use flow::SignInFlow;
pub use router::create_auth_router;
