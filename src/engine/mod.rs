// ==========================================
// 材料跟踪系统 - 引擎层
// ==========================================
// 职责: 行分类、KPI 聚合、报告构建
// 红线: Engine 不做 I/O，不依赖存储
// ==========================================

pub mod classifier;
pub mod error;
pub mod predicates;
pub mod report_builder;

// 重导出核心引擎
pub use classifier::RowClassifier;
pub use error::{ClassifyError, ClassifyResult};
pub use predicates::{status_is_received, RowPredicate, WorklistPredicate};
pub use report_builder::ReportBuilder;
