// ==========================================
// 材料跟踪系统 - 驾驶舱 API
// ==========================================
// 职责: 导入 → 分类 → 报告 → 持久化；工作清单备注编辑
// 红线: 工作清单中仅 LISTA DE PEDIDO 可被修改
// 说明: 存储写入经内部互斥锁串行（load-modify-save）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ClassifierConfig;
use crate::domain::classification::WorklistEntry;
use crate::domain::project::Project;
use crate::domain::report::DashboardReport;
use crate::engine::classifier::RowClassifier;
use crate::engine::report_builder::ReportBuilder;
use crate::importer::procurement_importer_impl::{ImportedTable, ProcurementImporterImpl};
use crate::importer::procurement_importer_trait::ProcurementImporter;
use crate::importer::table::RawTable;
use crate::repository::project_store::ProjectStore;
use chrono::Local;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    config: ClassifierConfig,
    importer: ProcurementImporterImpl,
    classifier: RowClassifier,
    report_builder: ReportBuilder,
    store: Arc<dyn ProjectStore>,
    write_lock: Mutex<()>,
}

impl DashboardApi {
    /// 创建 DashboardApi（配置先校验）
    pub fn new(config: ClassifierConfig, store: Arc<dyn ProjectStore>) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            importer: ProcurementImporterImpl::from_config(&config),
            classifier: RowClassifier::from_config(&config),
            report_builder: ReportBuilder::new(config.preview_limit),
            config,
            store,
            write_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    // ==========================================
    // 报告生成
    // ==========================================

    /// 导入文件并保存为新项目
    ///
    /// # 参数
    /// - file_path: 表格文件路径（.xlsx/.xls/.ods/.csv）
    /// - name: 项目名称（不能为空）
    ///
    /// # 返回
    /// - Ok(Project): 已保存的项目
    /// - Err(ApiError::Schema): 缺少列 / 列数不足
    /// - Err(ApiError::NoValidRows): 没有有效数据行
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub async fn process_file<P: AsRef<Path> + Send>(&self, file_path: P, name: &str) -> ApiResult<Project> {
        let name = validate_name(name)?;
        let imported = self.importer.import_file(file_path).await?;
        let project = self.project_from_import(imported, name)?;
        self.append_project(project)
    }

    /// 对内存表格分类并保存为新项目
    pub fn process_table(&self, table: RawTable, name: &str) -> ApiResult<Project> {
        let name = validate_name(name)?;
        let imported = self.importer.prepare_table(table, None)?;
        let project = self.project_from_import(imported, name)?;
        self.append_project(project)
    }

    /// 仅生成报告（不持久化）
    pub fn build_report(&self, table: &RawTable) -> ApiResult<DashboardReport> {
        let imported = self.importer.prepare_table(table.clone(), None)?;
        self.report_from_import(&imported)
    }

    /// 批量处理文件（并发导入，一个文件失败不影响其他文件）
    ///
    /// 项目名称取文件名（不含扩展名）。
    pub async fn batch_process<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<Project, String>> {
        let names: Vec<String> = file_paths
            .iter()
            .map(|p| project_name_for(p.as_ref()))
            .collect();

        let imports = self.importer.batch_import(file_paths).await;

        imports
            .into_iter()
            .zip(names)
            .map(|(imported, name)| {
                let imported = imported?;
                self.project_from_import(imported, &name)
                    .and_then(|project| self.append_project(project))
                    .map_err(|e| {
                        warn!(project = %name, error = %e, "批量处理: 项目生成失败");
                        format!("{}: {}", name, e)
                    })
            })
            .collect()
    }

    // ==========================================
    // 项目查询
    // ==========================================

    pub fn list_projects(&self) -> ApiResult<Vec<Project>> {
        Ok(self.store.load()?)
    }

    pub fn get_project(&self, project_id: &str) -> ApiResult<Project> {
        self.store
            .load()?
            .into_iter()
            .find(|p| p.project_id == project_id)
            .ok_or_else(|| project_not_found(project_id))
    }

    pub fn delete_project(&self, project_id: &str) -> ApiResult<()> {
        self.modify_projects(|projects| {
            let before = projects.len();
            projects.retain(|p| p.project_id != project_id);
            if projects.len() == before {
                return Err(project_not_found(project_id));
            }
            Ok(())
        })?;
        info!(project_id = %project_id, "项目已删除");
        Ok(())
    }

    // ==========================================
    // 工作清单编辑
    // ==========================================

    /// 修改单个条目的 LISTA DE PEDIDO
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): index 超出工作清单范围
    pub fn update_note(&self, project_id: &str, index: usize, note: &str) -> ApiResult<Project> {
        self.modify_project(project_id, |project| {
            let len = project.report.worklist.len();
            let entry = project.report.worklist.get_mut(index).ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "índice {} fuera de rango (la tabla resumen tiene {} filas)",
                    index, len
                ))
            })?;
            entry.set_note(note);
            Ok(())
        })
    }

    /// 以编辑后的工作清单整体替换（原样保存）
    pub fn replace_worklist(&self, project_id: &str, entries: Vec<WorklistEntry>) -> ApiResult<Project> {
        self.modify_project(project_id, move |project| {
            project.report.worklist = entries;
            Ok(())
        })
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn report_from_import(&self, imported: &ImportedTable) -> ApiResult<DashboardReport> {
        let result = self.classifier.classify(&imported.records)?;
        let loaded_at = Local::now().naive_local();
        Ok(self
            .report_builder
            .build(&imported.table, &imported.records, result, loaded_at))
    }

    fn project_from_import(&self, imported: ImportedTable, name: &str) -> ApiResult<Project> {
        let report = self.report_from_import(&imported)?;
        info!(
            project = %name,
            requested = report.kpis.requested_count,
            received = report.kpis.received_count,
            missing_po = report.kpis.missing_po_count,
            progress = report.kpis.progress_pct,
            worklist = report.worklist.len(),
            "报告生成完成"
        );
        Ok(Project::new(name, imported.source_file, report))
    }

    fn append_project(&self, project: Project) -> ApiResult<Project> {
        let saved = project.clone();
        self.modify_projects(move |projects| {
            projects.push(project);
            Ok(())
        })?;
        info!(project_id = %saved.project_id, name = %saved.name, "项目已保存");
        Ok(saved)
    }

    fn modify_project<F>(&self, project_id: &str, f: F) -> ApiResult<Project>
    where
        F: FnOnce(&mut Project) -> ApiResult<()>,
    {
        self.modify_projects(|projects| {
            let project = projects
                .iter_mut()
                .find(|p| p.project_id == project_id)
                .ok_or_else(|| project_not_found(project_id))?;
            f(project)?;
            project.touch();
            Ok(project.clone())
        })
    }

    /// load-modify-save，持有写锁
    fn modify_projects<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut Vec<Project>) -> ApiResult<R>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| ApiError::InternalError(format!("bloqueo de escritura envenenado: {}", e)))?;

        let mut projects = self.store.load()?;
        let out = f(&mut projects)?;
        self.store.save(&projects)?;
        Ok(out)
    }
}

fn validate_name(name: &str) -> ApiResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(
            "el nombre del proyecto no puede estar vacío".to_string(),
        ));
    }
    Ok(trimmed)
}

fn project_not_found(project_id: &str) -> ApiError {
    ApiError::NotFound(format!("proyecto {}", project_id))
}

/// 文件名（不含扩展名）作为项目名称
pub fn project_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "proyecto".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryResult;

    #[derive(Default)]
    struct MemoryStore {
        projects: Mutex<Vec<Project>>,
    }

    impl ProjectStore for MemoryStore {
        fn load(&self) -> RepositoryResult<Vec<Project>> {
            Ok(self.projects.lock().unwrap().clone())
        }

        fn save(&self, projects: &[Project]) -> RepositoryResult<()> {
            *self.projects.lock().unwrap() = projects.to_vec();
            Ok(())
        }
    }

    fn api() -> DashboardApi {
        DashboardApi::new(ClassifierConfig::default(), Arc::new(MemoryStore::default())).unwrap()
    }

    fn table() -> RawTable {
        RawTable::from_text_rows(
            [
                "No. S.C.",
                "CANT ITEM S.C.",
                "DESCRIPCION DE LA PARTIDA",
                "No. O.C.",
                "FECHA DE LLEGADA",
                "ESTATUS GRN",
            ],
            vec![
                vec!["1", "2", "TUBO", "OC-1", "2024-01-05", "RECV"],
                vec!["2", "1", "CODO", "", "", "PEND"],
            ],
        )
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = api().process_table(table(), "   ").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_update_note_out_of_range() {
        let api = api();
        let project = api.process_table(table(), "Obra").unwrap();
        let err = api.update_note(&project.project_id, 5, "x").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_project_name_for() {
        assert_eq!(project_name_for(Path::new("/tmp/obra norte.xlsx")), "obra norte");
    }
}
