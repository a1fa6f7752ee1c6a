// ==========================================
// 材料跟踪系统 - 分类结果领域模型
// ==========================================
// 职责: KPI 计数器 + 工作清单（tabla_resumen）
// 红线: 工作清单中仅 LISTA DE PEDIDO 允许外部修改
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Kpis - 聚合计数器
// ==========================================
// 序列化字段与驾驶舱前端一致
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    #[serde(rename = "items_requisitados")]
    pub requested_count: usize,
    #[serde(rename = "items_recibidos")]
    pub received_count: usize,
    #[serde(rename = "items_sin_oc")]
    pub missing_po_count: usize,
    #[serde(rename = "avance")]
    pub progress_pct: f64,
}

impl Kpis {
    /// 由计数器计算 KPI（requested = 0 时进度为 0.0）
    pub fn from_counts(requested_count: usize, received_count: usize, missing_po_count: usize) -> Self {
        let progress_pct = if requested_count > 0 {
            received_count as f64 / requested_count as f64 * 100.0
        } else {
            0.0
        };

        Self {
            requested_count,
            received_count,
            missing_po_count,
            progress_pct,
        }
    }
}

// ==========================================
// WorklistEntry - 工作清单条目
// ==========================================
// 所有字段均为显示文本，note 初始为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklistEntry {
    #[serde(rename = "No. S.C.")]
    pub id: String,
    #[serde(rename = "CANT ITEM")]
    pub quantity: String,
    #[serde(rename = "DESCRIPCION")]
    pub item_description: String,
    #[serde(rename = "No. O.C.")]
    pub po_ref: String,
    #[serde(rename = "FECHA LLEGADA")]
    pub arrival_date: String,
    #[serde(rename = "LISTA DE PEDIDO", default)]
    pub note: String,
    #[serde(rename = "ESTATUS?")]
    pub status: String,
}

impl WorklistEntry {
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }
}

// ==========================================
// ClassificationWarning - 非致命提示
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationWarning {
    /// 工作清单规则未匹配任何行
    EmptyWorklist,
}

// ==========================================
// ClassificationResult - 单次分类结果
// ==========================================
// 每张上传表格生成一次，除 note 外不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub kpis: Kpis,
    pub worklist: Vec<WorklistEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ClassificationWarning>,
}

impl ClassificationResult {
    pub fn has_warning(&self, warning: ClassificationWarning) -> bool {
        self.warnings.contains(&warning)
    }
}
