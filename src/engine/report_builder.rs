// ==========================================
// 材料跟踪系统 - 驾驶舱报告构建
// ==========================================
// 职责: 分类结果 + 原始表 → DashboardReport
// 说明: data 预览仅包含 solicitado 行（列名 → 显示文本）
// ==========================================

use crate::domain::classification::ClassificationResult;
use crate::domain::record::ProcurementRecord;
use crate::domain::report::{DashboardReport, PreviewRow};
use crate::importer::table::RawTable;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub struct ReportBuilder {
    preview_limit: usize,
}

impl ReportBuilder {
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    /// 构建报告
    ///
    /// # 参数
    /// - table: 原始表（records 与 table.rows 一一对应）
    /// - records: RecordMapper 输出
    /// - result: 分类结果
    /// - loaded_at: 加载时间（fecha_carga）
    pub fn build(
        &self,
        table: &RawTable,
        records: &[ProcurementRecord],
        result: ClassificationResult,
        loaded_at: NaiveDateTime,
    ) -> DashboardReport {
        let preview = self.preview(table, records);
        debug!(preview_rows = preview.len(), limit = self.preview_limit, "预览生成完成");
        DashboardReport::new(result, preview, loaded_at)
    }

    /// solicitado 行的预览（保持源顺序与列顺序，截断到 preview_limit）
    pub fn preview(&self, table: &RawTable, records: &[ProcurementRecord]) -> Vec<PreviewRow> {
        let keys = preview_keys(&table.headers);
        table
            .rows
            .iter()
            .zip(records)
            .filter(|(_, record)| record.is_requested())
            .take(self.preview_limit)
            .map(|(row, _)| {
                keys.iter()
                    .map(|(idx, key)| (key.clone(), Value::String(row.cell(*idx).display())))
                    .collect::<PreviewRow>()
            })
            .collect()
    }
}

/// 预览列: (列索引, 键)
///
/// 空列名跳过；重复列名依次加后缀 ".1"、".2"，避免互相覆盖
fn preview_keys(headers: &[String]) -> Vec<(usize, String)> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.is_empty())
        .map(|(idx, header)| {
            let n = seen.entry(header.as_str()).or_insert(0);
            let key = if *n == 0 {
                header.clone()
            } else {
                format!("{}.{}", header, n)
            };
            *n += 1;
            (idx, key)
        })
        .collect()
}
