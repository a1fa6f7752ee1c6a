// ==========================================
// 材料跟踪系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为面向用户的西班牙语消息
// 说明: 表结构错误原样透出缺失列 / 最少列数
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::error::ClassifyError;
use crate::importer::error::{ImportError, SchemaError};
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("No encontrado: {0}")]
    NotFound(String),

    // ==========================================
    // 表格错误
    // ==========================================
    /// 表结构不满足列要求（整张表拒绝）
    #[error("{0}")]
    Schema(SchemaError),

    /// 没有任何有效数据行
    #[error("{0}")]
    NoValidRows(ClassifyError),

    #[error("Error al importar el archivo: {0}")]
    ImportError(String),

    // ==========================================
    // 配置与存储错误
    // ==========================================
    #[error("Error de configuración: {0}")]
    ConfigError(String),

    #[error("Error de almacenamiento: {0}")]
    StorageError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Error interno: {0}")]
    InternalError(String),
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        ApiError::Schema(err)
    }
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        ApiError::NoValidRows(err)
    }
}

// ==========================================
// 从 ImportError 转换
// 表结构错误单独保留，其余统一为导入失败
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Schema(schema) => ApiError::Schema(schema),
            ImportError::FileNotFound(path) => {
                ApiError::NotFound(format!("archivo {}", path))
            }
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::StorageError(format!("no se pudo obtener el bloqueo: {}", msg))
            }
            other => ApiError::StorageError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
