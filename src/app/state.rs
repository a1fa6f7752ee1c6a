// ==========================================
// 材料跟踪系统 - 应用状态
// ==========================================
// 职责: 打开共享数据库连接，解析配置，创建 DashboardApi
// 配置来源优先级: JSON 配置文件 > config_kv 表 > 默认值
// ==========================================

use crate::api::{ApiError, ApiResult, DashboardApi};
use crate::config::{ClassifierConfig, ConfigManager};
use crate::db::open_sqlite_connection;
use crate::repository::{ProjectStore, RepositoryError, SqliteProjectStore};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// 数据目录覆盖（环境变量）
pub const DATA_DIR_ENV: &str = "PROCUREMENT_KPI_DATA_DIR";

/// JSON 配置文件路径（环境变量）
pub const CONFIG_PATH_ENV: &str = "PROCUREMENT_KPI_CONFIG";

const DB_FILE_NAME: &str = "projects.db";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生效的分类器配置
    pub config: ClassifierConfig,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器（config_kv 表）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - config_file: JSON 配置文件（None 时读取 config_kv 表）
    pub fn new(db_path: String, config_file: Option<&Path>) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path).map_err(RepositoryError::from)?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let config = match config_file {
            Some(path) => {
                tracing::info!(config = %path.display(), "使用 JSON 配置文件");
                ClassifierConfig::from_json_file(path)?
            }
            None => config_manager.load_classifier_config()?,
        };
        tracing::debug!(
            received_rule = %config.received_rule,
            worklist_rule = %config.worklist_rule,
            "分类器配置已加载"
        );

        let store: Arc<dyn ProjectStore> = Arc::new(SqliteProjectStore::from_connection(conn)?);
        let dashboard_api = Arc::new(DashboardApi::new(config.clone(), store)?);

        Ok(Self {
            db_path,
            config,
            dashboard_api,
            config_manager,
        })
    }

    /// 按环境变量创建（PROCUREMENT_KPI_DATA_DIR / PROCUREMENT_KPI_CONFIG）
    pub fn from_env() -> ApiResult<Self> {
        let config_file = non_empty_env(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::new(get_default_db_path()?, config_file.as_deref())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 获取默认数据库路径
///
/// # 规则
/// 1. PROCUREMENT_KPI_DATA_DIR 已设置 → <dir>/projects.db
/// 2. 用户数据目录 → <data_dir>/procurement-kpi/projects.db
/// 3. 回退到当前目录 ./projects.db
pub fn get_default_db_path() -> ApiResult<String> {
    let dir = match non_empty_env(DATA_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => dirs::data_dir().map(|d| d.join("procurement-kpi")),
    };

    let path = match dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir).map_err(|e| {
                ApiError::StorageError(format!(
                    "no se pudo crear el directorio de datos {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            dir.join(DB_FILE_NAME)
        }
        None => PathBuf::from(".").join(DB_FILE_NAME),
    };

    Ok(path.to_string_lossy().to_string())
}
