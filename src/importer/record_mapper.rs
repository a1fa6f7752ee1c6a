// ==========================================
// 材料跟踪系统 - 记录映射器
// ==========================================
// 职责: RawRow + 列位置 → ProcurementRecord
// 说明: 非空但无法转换的单元格记为 CellCoercionIssue（仅用于诊断）
// ==========================================

use crate::domain::record::ProcurementRecord;
use crate::importer::cell_coercion::CellCoercer;
use crate::importer::column_resolver::{ColumnField, ResolvedColumns};
use crate::importer::table::{RawRow, RawTable};
use serde::{Deserialize, Serialize};

/// 单元格转换问题（非致命，值已按缺失处理）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCoercionIssue {
    pub source_row: usize,
    pub field: ColumnField,
    pub raw_value: String,
}

pub struct RecordMapper {
    coercer: CellCoercer,
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordMapper {
    pub fn new() -> Self {
        Self {
            coercer: CellCoercer,
        }
    }

    /// 映射单行
    pub fn map_row(
        &self,
        columns: &ResolvedColumns,
        row: &RawRow,
        issues: &mut Vec<CellCoercionIssue>,
    ) -> ProcurementRecord {
        let id_cell = row.cell(columns.requisition_id);
        let qty_cell = row.cell(columns.quantity);
        let arrival_cell = row.cell(columns.arrival_date);

        let requisition_id = self.coercer.coerce_number(id_cell);
        let quantity = self.coercer.coerce_number(qty_cell);
        let arrival_date = self.coercer.coerce_date(arrival_cell);

        let mut note_issue = |field: ColumnField, blank: bool, parsed: bool, raw: String| {
            if !blank && !parsed {
                issues.push(CellCoercionIssue {
                    source_row: row.source_row,
                    field,
                    raw_value: raw,
                });
            }
        };
        note_issue(
            ColumnField::RequisitionId,
            id_cell.is_blank(),
            requisition_id.is_some(),
            id_cell.display(),
        );
        note_issue(
            ColumnField::Quantity,
            qty_cell.is_blank(),
            quantity.is_some(),
            qty_cell.display(),
        );
        note_issue(
            ColumnField::ArrivalDate,
            arrival_cell.is_blank(),
            arrival_date.is_some(),
            arrival_cell.display(),
        );

        let arrival_label = match arrival_date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => arrival_cell.display(),
        };

        ProcurementRecord {
            requisition_id,
            requisition_label: id_cell.display(),
            quantity,
            quantity_label: qty_cell.display(),
            description: self.coercer.normalize_text(row.cell(columns.description)),
            po_ref: self.coercer.normalize_text(row.cell(columns.po_ref)),
            arrival_date,
            arrival_label,
            status: self.coercer.normalize_text(row.cell(columns.status)),
            source_row: row.source_row,
        }
    }

    /// 映射整张表（保持源顺序）
    pub fn map_table(
        &self,
        table: &RawTable,
        columns: &ResolvedColumns,
    ) -> (Vec<ProcurementRecord>, Vec<CellCoercionIssue>) {
        let mut issues = Vec::new();
        let records = table
            .rows
            .iter()
            .map(|row| self.map_row(columns, row, &mut issues))
            .collect();
        (records, issues)
    }
}
