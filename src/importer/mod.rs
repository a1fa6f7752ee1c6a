// ==========================================
// 材料跟踪系统 - 导入层
// ==========================================
// 职责: 外部表格读取，生成 ProcurementRecord
// 支持: Excel, CSV, 内存表格
// ==========================================

// 模块声明
pub mod cell_coercion;
pub mod column_resolver;
pub mod error;
pub mod file_parser;
pub mod header_locator;
pub mod procurement_importer_impl;
pub mod procurement_importer_trait;
pub mod record_mapper;
pub mod table;

// 重导出核心类型
pub use cell_coercion::CellCoercer;
pub use column_resolver::{ColumnBinding, ColumnField, ColumnSchema, ResolvedColumns};
pub use error::{ImportError, ImportResult, SchemaError};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use header_locator::{HeaderLocator, SheetGrid};
pub use procurement_importer_impl::{ImportedTable, ProcurementImporterImpl};
pub use record_mapper::{CellCoercionIssue, RecordMapper};
pub use table::{Cell, RawRow, RawTable};

// 重导出 Trait 接口
pub use procurement_importer_trait::{FileParser, ProcurementImporter};
