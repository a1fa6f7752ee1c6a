// ==========================================
// 材料跟踪系统 - 核心库
// ==========================================
// 功能: 采购申请表分类与 KPI 聚合
// 输出: items_requisitados / items_recibidos / items_sin_oc / avance + 工作清单
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录、规则与报告类型
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 行分类与 KPI 聚合
pub mod engine;

// 配置层 - 分类器配置
pub mod config;

// 数据仓储层 - 项目持久化
pub mod repository;

// API 层 - 驾驶舱接口
pub mod api;

// 应用层 - 组装
pub mod app;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ReceivedRule, WorklistRule};

// 领域实体
pub use domain::{
    ClassificationResult, ClassificationWarning, DashboardReport, Kpis, ProcurementRecord,
    Project, WorklistEntry,
};

// 引擎
pub use engine::{ClassifyError, ReportBuilder, RowClassifier};

// 配置
pub use config::ClassifierConfig;

// API
pub use api::{ApiError, ApiResult, DashboardApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Tablero de seguimiento de materiales";
