// ==========================================
// 材料跟踪系统 - 驾驶舱报告
// ==========================================
// 职责: 分类结果的对外 JSON 形态（kpis / tabla_resumen / data / fecha_carga / warnings）
// ==========================================

use crate::domain::classification::{
    ClassificationResult, ClassificationWarning, Kpis, WorklistEntry,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// fecha_carga 的显示格式
pub const LOADED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 预览行: 列名 → 显示文本（空单元格为 ""），保持工作表列顺序
pub type PreviewRow = Map<String, Value>;

// ==========================================
// DashboardReport - 驾驶舱报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub kpis: Kpis,
    #[serde(rename = "tabla_resumen")]
    pub worklist: Vec<WorklistEntry>,
    #[serde(rename = "data", default)]
    pub preview: Vec<PreviewRow>,
    #[serde(rename = "fecha_carga")]
    pub loaded_at: String,
    /// 非致命提示（例如工作清单为空），由调用方与 KPI 一起展示
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ClassificationWarning>,
}

impl DashboardReport {
    pub fn new(result: ClassificationResult, preview: Vec<PreviewRow>, loaded_at: NaiveDateTime) -> Self {
        Self {
            kpis: result.kpis,
            worklist: result.worklist,
            preview,
            loaded_at: loaded_at.format(LOADED_AT_FORMAT).to_string(),
            warnings: result.warnings,
        }
    }

    pub fn has_warning(&self, warning: ClassificationWarning) -> bool {
        self.warnings.contains(&warning)
    }
}
