// ==========================================
// 材料跟踪系统 - 导入接口 Trait
// ==========================================
// 职责: 定义文件解析与导入流程接口（不包含实现）
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::header_locator::SheetGrid;
use crate::importer::procurement_importer_impl::ImportedTable;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// ProcurementImporter Trait
// ==========================================
// 用途: 采购表导入主接口
// 实现者: ProcurementImporterImpl
#[async_trait]
pub trait ProcurementImporter: Send + Sync {
    /// 导入单个文件
    ///
    /// # 导入流程（4个阶段）
    /// 1. 文件读取与解析
    /// 2. 表头定位
    /// 3. 列解析（缺列 → SchemaError）
    /// 4. 记录映射（单元格转换失败 → 缺失值）
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportedTable>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 如果某个文件导入失败，不影响其他文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportedTable, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始单元格矩阵（含表头之前的行）
    fn parse_grid(&self, file_path: &Path) -> ImportResult<SheetGrid>;
}
