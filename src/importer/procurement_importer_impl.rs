// ==========================================
// 材料跟踪系统 - 采购表导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到 ProcurementRecord
// 流程: 解析 → 表头定位 → 列解析 → 映射
// ==========================================

use crate::config::ClassifierConfig;
use crate::domain::record::ProcurementRecord;
use crate::importer::column_resolver::{ColumnSchema, ResolvedColumns};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::header_locator::HeaderLocator;
use crate::importer::procurement_importer_trait::{FileParser, ProcurementImporter};
use crate::importer::record_mapper::{CellCoercionIssue, RecordMapper};
use crate::importer::table::RawTable;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// 导入结果（尚未分类）
#[derive(Debug, Clone)]
pub struct ImportedTable {
    pub source_file: Option<String>,
    pub table: RawTable,
    pub columns: ResolvedColumns,
    pub records: Vec<ProcurementRecord>,
    pub issues: Vec<CellCoercionIssue>,
}

// ==========================================
// ProcurementImporterImpl - 导入器实现
// ==========================================
#[derive(Clone)]
pub struct ProcurementImporterImpl {
    file_parser: Arc<dyn FileParser>,
    header: HeaderLocator,
    columns: ColumnSchema,
    mapper: Arc<RecordMapper>,
}

impl ProcurementImporterImpl {
    pub fn new(file_parser: Arc<dyn FileParser>, header: HeaderLocator, columns: ColumnSchema) -> Self {
        Self {
            file_parser,
            header,
            columns,
            mapper: Arc::new(RecordMapper::new()),
        }
    }

    /// 按配置创建（通用解析器 + 配置中的表头/列绑定）
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            Arc::new(UniversalFileParser::new(config.sheet_name.clone())),
            config.header.clone(),
            config.columns.clone(),
        )
    }

    /// 同步导入单个文件
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    pub fn import_path(&self, file_path: &Path) -> ImportResult<ImportedTable> {
        info!("开始导入采购表");

        // === 步骤 1: 解析文件 ===
        let grid = self.file_parser.parse_grid(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        debug!(grid_rows = grid.len(), "文件解析完成");

        // === 步骤 2: 表头定位 ===
        let table = self.header.locate(grid)?;

        let source_file = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());

        // === 步骤 3-4: 列解析 + 映射 ===
        self.prepare_table(table, source_file)
    }

    /// 对已在内存中的表格执行列解析与映射
    pub fn prepare_table(
        &self,
        table: RawTable,
        source_file: Option<String>,
    ) -> ImportResult<ImportedTable> {
        let columns = self.columns.resolve(&table).map_err(|e| {
            warn!(error = %e, "表结构校验失败");
            e
        })?;

        let (records, issues) = self.mapper.map_table(&table, &columns);
        info!(
            rows = records.len(),
            coercion_issues = issues.len(),
            "记录映射完成"
        );
        for issue in &issues {
            debug!(
                row = issue.source_row,
                field = %issue.field,
                value = %issue.raw_value,
                "单元格无法转换，按缺失处理"
            );
        }

        Ok(ImportedTable {
            source_file,
            table,
            columns,
            records,
            issues,
        })
    }
}

#[async_trait::async_trait]
impl ProcurementImporter for ProcurementImporterImpl {
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportedTable> {
        let path = file_path.as_ref().to_path_buf();
        let importer = self.clone();

        // 文件解析为阻塞 IO，放到阻塞线程池执行
        tokio::task::spawn_blocking(move || importer.import_path(&path))
            .await
            .map_err(|e| ImportError::InternalError(format!("tarea de importación abortada: {}", e)))?
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportedTable, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            async move {
                match self.import_file(path).await {
                    Ok(imported) => {
                        info!(file = %path_str, rows = imported.records.len(), "文件导入成功");
                        Ok(imported)
                    }
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("{}: {}", path_str, e))
                    }
                }
            }
        });

        // 并发执行所有导入任务
        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
