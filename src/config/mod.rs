// ==========================================
// 材料跟踪系统 - 配置层
// ==========================================
// 职责: 分类器配置管理（JSON 文件 / config_kv 表）
// ==========================================

pub mod classifier_config;
pub mod config_manager;
pub mod error;

// 重导出核心配置类型
pub use classifier_config::{ClassifierConfig, DEFAULT_PREVIEW_LIMIT, DEFAULT_SERVICE_MARKER};
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
