// ==========================================
// 材料跟踪系统 - 采购记录领域模型
// ==========================================
// 职责: 一行采购申请数据（已完成单元格转换）
// 红线: 转换失败的单元格一律视为缺失，不视为 0
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProcurementRecord - 采购记录
// ==========================================
// 用途: 导入层写入，分类引擎只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementRecord {
    // ===== 主键 =====
    pub requisition_id: Option<f64>, // No. S.C.（数值转换结果，None = 非数据行）
    pub requisition_label: String,   // No. S.C. 原始显示文本

    // ===== 数量 =====
    pub quantity: Option<f64>,  // CANT ITEM S.C.（None = 未申请）
    pub quantity_label: String, // 数量显示文本

    // ===== 描述与订单 =====
    pub description: Option<String>, // DESCRIPCION DE LA PARTIDA
    pub po_ref: Option<String>,      // No. O.C.（None = 缺少采购订单）

    // ===== 到货 =====
    pub arrival_date: Option<NaiveDate>, // FECHA DE LLEGADA（可解析时）
    pub arrival_label: String,           // 到货日期显示文本

    // ===== 状态 =====
    pub status: Option<String>, // ESTATUS GRN

    // ===== 元信息 =====
    pub source_row: usize, // 源文件行号（1 起）
}

impl ProcurementRecord {
    /// 主键可转换为数值（数据行闸门）
    pub fn is_valid(&self) -> bool {
        self.requisition_id.is_some()
    }

    /// 有效行且数量存在
    pub fn is_requested(&self) -> bool {
        self.is_valid() && self.quantity.is_some()
    }

    pub fn has_po(&self) -> bool {
        self.po_ref
            .as_deref()
            .map(|po| !po.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Option<f64>, qty: Option<f64>, po: Option<&str>) -> ProcurementRecord {
        ProcurementRecord {
            requisition_id: id,
            requisition_label: id.map(|v| v.to_string()).unwrap_or_default(),
            quantity: qty,
            quantity_label: String::new(),
            description: None,
            po_ref: po.map(|s| s.to_string()),
            arrival_date: None,
            arrival_label: String::new(),
            status: None,
            source_row: 1,
        }
    }

    #[test]
    fn test_requested_requires_valid_id() {
        assert!(record(Some(1.0), Some(2.0), None).is_requested());
        assert!(!record(None, Some(2.0), None).is_requested());
        assert!(!record(Some(1.0), None, None).is_requested());
    }

    #[test]
    fn test_blank_po_is_missing() {
        assert!(record(Some(1.0), Some(1.0), Some("OC-77")).has_po());
        assert!(!record(Some(1.0), Some(1.0), Some("   ")).has_po());
        assert!(!record(Some(1.0), Some(1.0), None).has_po());
    }
}
