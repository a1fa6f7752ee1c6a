// ==========================================
// 材料跟踪系统 - 配置模块错误类型
// ==========================================

use crate::domain::types::ReceivedRuleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No se pudo leer la configuración: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuración JSON inválida: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Valor de configuración inválido (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error(transparent)]
    ReceivedRule(#[from] ReceivedRuleError),

    #[error("Error en la base de configuración: {0}")]
    Database(String),

    #[error("No se pudo obtener el bloqueo de configuración: {0}")]
    LockError(String),
}

impl ConfigError {
    pub fn invalid(key: &str, value: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.into(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Database(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
