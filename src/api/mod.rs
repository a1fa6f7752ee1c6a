// ==========================================
// 材料跟踪系统 - API 层
// ==========================================
// 职责: 提供驾驶舱业务接口（命令行 / 外部调用方使用）
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{project_name_for, DashboardApi};
pub use error::{ApiError, ApiResult};
