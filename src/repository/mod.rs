// ==========================================
// 材料跟踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 项目列表的持久化（JSON 文件 / SQLite）
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod json_project_store;
pub mod project_store;
pub mod sqlite_project_store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use json_project_store::JsonFileProjectStore;
pub use project_store::ProjectStore;
pub use sqlite_project_store::SqliteProjectStore;
