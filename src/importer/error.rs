// ==========================================
// 材料跟踪系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单元格转换失败不属于错误（统一转为缺失值）
// ==========================================

use thiserror::Error;

/// 表结构错误（致命：整张表拒绝，不输出部分 KPI）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Faltan columnas: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("La tabla requiere al menos {required} columnas (tiene {actual})")]
    TooFewColumns { required: usize, actual: usize },
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato no soportado: {0} (solo .xlsx/.xlsm/.xls/.ods/.csv)")]
    UnsupportedFormat(String),

    #[error("Error al leer el archivo: {0}")]
    FileReadError(String),

    #[error("Error al interpretar Excel: {0}")]
    ExcelParseError(String),

    #[error("Error al interpretar CSV: {0}")]
    CsvParseError(String),

    #[error("Hoja no encontrada: {0}")]
    SheetNotFound(String),

    #[error("El archivo no contiene datos")]
    EmptySheet,

    // ===== 表头与表结构 =====
    #[error("No se encontró la fila de encabezado '{phrase}' en las primeras {scanned} filas")]
    HeaderNotFound { phrase: String, scanned: usize },

    #[error("Fila de encabezado fuera de rango: {offset} (el archivo tiene {rows} filas)")]
    HeaderOffsetOutOfRange { offset: usize, rows: usize },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    // ===== 通用错误 =====
    #[error("Error interno: {0}")]
    InternalError(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
