//! 应用配置数据模型

pub mod config;
