//! 注册表单中继模块
//!
//! 唯一的后端业务路由：把注册表单转成事务邮件发给团队收件箱

pub mod email;
mod handlers;
mod router;
mod types;

pub use email::EmailSender;
pub use router::create_relay_router;
