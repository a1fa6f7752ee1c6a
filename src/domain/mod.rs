// ==========================================
// 材料跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义采购记录、分类规则、KPI 与报告类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod classification;
pub mod project;
pub mod record;
pub mod report;
pub mod types;

// 重导出核心类型
pub use classification::{ClassificationResult, ClassificationWarning, Kpis, WorklistEntry};
pub use project::Project;
pub use record::ProcurementRecord;
pub use report::{DashboardReport, PreviewRow, LOADED_AT_FORMAT};
pub use types::{ReceivedRule, ReceivedRuleError, ReceivedRuleRepr, WorklistRule};
