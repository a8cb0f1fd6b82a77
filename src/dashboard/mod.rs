//! 演示仪表盘模块
//!
//! 提供模拟数据集生成、过滤/排序/分页视图、展示格式化与导出

pub mod controller;
pub mod export;
pub mod format;
pub mod generate;
pub mod model;
pub mod store;
pub mod view;
mod handlers;
mod router;
mod types;

pub use controller::FilterController;
pub use router::create_dashboard_router;
pub use store::DashboardStore;
