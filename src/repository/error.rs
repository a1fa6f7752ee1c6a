// ==========================================
// 材料跟踪系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 文件存储错误 =====
    #[error("Error de E/S en el almacén: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),

    // ===== 数据库错误 =====
    #[error("Registro no encontrado: {entity} con id={id}")]
    NotFound { entity: String, id: String },

    #[error("Error al obtener el bloqueo de la base de datos: {0}")]
    LockError(String),

    #[error("Error de consulta en la base de datos: {0}")]
    DatabaseQueryError(String),

    #[error("Error de transacción en la base de datos: {0}")]
    DatabaseTransactionError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
