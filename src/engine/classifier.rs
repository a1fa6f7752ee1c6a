// ==========================================
// 材料跟踪系统 - 行分类与 KPI 聚合引擎
// ==========================================
// 职责: 判定每行是否 solicitado / recibido / sin OC / 进入工作清单
// 红线: 无状态、无副作用、无 I/O 操作
// 红线: recibido 与 solicitado 使用同一行集合（recibido ≤ solicitado）
// ==========================================

use crate::config::ClassifierConfig;
use crate::domain::classification::{
    ClassificationResult, ClassificationWarning, Kpis, WorklistEntry,
};
use crate::domain::record::ProcurementRecord;
use crate::domain::types::ReceivedRule;
use crate::engine::error::{ClassifyError, ClassifyResult};
use crate::engine::predicates::{RowPredicate, WorklistPredicate};
use tracing::{debug, warn};

// ==========================================
// RowClassifier - 行分类器
// ==========================================
pub struct RowClassifier {
    received: ReceivedRule,
    worklist: WorklistPredicate,
}

impl RowClassifier {
    pub fn new(received: ReceivedRule, worklist: WorklistPredicate) -> Self {
        Self { received, worklist }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            config.received_rule.clone(),
            WorklistPredicate::new(
                config.worklist_rule,
                config.received_rule.clone(),
                &config.service_marker,
            ),
        )
    }

    /// 分类并聚合
    ///
    /// # 计算流程
    /// 1. 数据行闸门: No. S.C. 可转换为数值
    /// 2. solicitado: 闸门内且数量存在
    /// 3. recibido: solicitado 集合中满足收货规则
    /// 4. sin OC: solicitado 集合中 No. O.C. 为空
    /// 5. avance = recibido / solicitado * 100（solicitado = 0 时为 0.0）
    /// 6. 工作清单: 闸门内满足清单规则的行，保持源顺序
    ///
    /// # 返回
    /// - Err(NoValidRows): 闸门后没有任何行
    pub fn classify(&self, records: &[ProcurementRecord]) -> ClassifyResult<ClassificationResult> {
        let valid: Vec<&ProcurementRecord> = records.iter().filter(|r| r.is_valid()).collect();
        if valid.is_empty() {
            return Err(ClassifyError::NoValidRows {
                total_rows: records.len(),
            });
        }

        let requested: Vec<&ProcurementRecord> = valid
            .iter()
            .copied()
            .filter(|r| r.quantity.is_some())
            .collect();

        let received_count = requested
            .iter()
            .filter(|r| self.received.matches(r))
            .count();
        let missing_po_count = requested.iter().filter(|r| !r.has_po()).count();

        let kpis = Kpis::from_counts(requested.len(), received_count, missing_po_count);

        let worklist: Vec<WorklistEntry> = valid
            .iter()
            .filter(|r| self.worklist.matches(r))
            .map(|r| project_entry(r))
            .collect();

        let mut warnings = Vec::new();
        if worklist.is_empty() {
            warn!(rule = %self.worklist.rule(), "工作清单为空");
            warnings.push(ClassificationWarning::EmptyWorklist);
        }

        debug!(
            total_rows = records.len(),
            valid_rows = valid.len(),
            requested = kpis.requested_count,
            received = kpis.received_count,
            missing_po = kpis.missing_po_count,
            worklist = worklist.len(),
            "分类完成"
        );

        Ok(ClassificationResult {
            kpis,
            worklist,
            warnings,
        })
    }
}

/// 投影为工作清单条目（note 初始为空）
fn project_entry(record: &ProcurementRecord) -> WorklistEntry {
    WorklistEntry {
        id: record.requisition_label.clone(),
        quantity: record.quantity_label.clone(),
        item_description: record.description.clone().unwrap_or_default(),
        po_ref: record.po_ref.clone().unwrap_or_default(),
        arrival_date: record.arrival_label.clone(),
        note: String::new(),
        status: record.status.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::WorklistRule;

    fn rec(id: Option<f64>, qty: Option<f64>, status: &str, po: Option<&str>) -> ProcurementRecord {
        ProcurementRecord {
            requisition_id: id,
            requisition_label: id.map(|v| format!("{}", v as i64)).unwrap_or_else(|| "X".to_string()),
            quantity: qty,
            quantity_label: qty.map(|v| format!("{}", v)).unwrap_or_default(),
            description: Some("MATERIAL".to_string()),
            po_ref: po.map(|s| s.to_string()),
            arrival_date: None,
            arrival_label: String::new(),
            status: Some(status.to_string()),
            source_row: 2,
        }
    }

    fn classifier(received: ReceivedRule, rule: WorklistRule) -> RowClassifier {
        RowClassifier::new(
            received.clone(),
            WorklistPredicate::new(rule, received, "SERVICIO"),
        )
    }

    #[test]
    fn test_received_never_exceeds_requested() {
        // 收货但数量缺失的行不计入 recibido
        let records = vec![
            rec(Some(1.0), Some(2.0), "RECV", Some("OC")),
            rec(Some(2.0), None, "RECV", Some("OC")),
        ];
        let result = classifier(ReceivedRule::Exact("RECV".to_string()), WorklistRule::Received)
            .classify(&records)
            .unwrap();

        assert_eq!(result.kpis.requested_count, 1);
        assert_eq!(result.kpis.received_count, 1);
        assert!(result.kpis.received_count <= result.kpis.requested_count);
        // 工作清单作用于闸门集合，两行都进入
        assert_eq!(result.worklist.len(), 2);
    }

    #[test]
    fn test_zero_requested_gives_zero_progress() {
        let records = vec![rec(Some(1.0), None, "RECV", None)];
        let result = classifier(ReceivedRule::default(), WorklistRule::AllRows)
            .classify(&records)
            .unwrap();

        assert_eq!(result.kpis.requested_count, 0);
        assert_eq!(result.kpis.progress_pct, 0.0);
    }

    #[test]
    fn test_no_valid_rows() {
        let records = vec![rec(None, Some(1.0), "RECV", None)];
        let err = classifier(ReceivedRule::default(), WorklistRule::Received)
            .classify(&records)
            .unwrap_err();
        assert_eq!(err, ClassifyError::NoValidRows { total_rows: 1 });
    }

    #[test]
    fn test_empty_worklist_is_warning_not_error() {
        let records = vec![rec(Some(1.0), Some(1.0), "PEND", Some("OC"))];
        let result = classifier(ReceivedRule::default(), WorklistRule::Received)
            .classify(&records)
            .unwrap();

        assert!(result.worklist.is_empty());
        assert!(result.has_warning(ClassificationWarning::EmptyWorklist));
        assert_eq!(result.kpis.requested_count, 1);
    }

    #[test]
    fn test_projection_fields() {
        let records = vec![rec(Some(1001.0), Some(5.0), "RECV", None)];
        let result = classifier(ReceivedRule::default(), WorklistRule::Received)
            .classify(&records)
            .unwrap();

        let entry = &result.worklist[0];
        assert_eq!(entry.id, "1001");
        assert_eq!(entry.quantity, "5");
        assert_eq!(entry.item_description, "MATERIAL");
        assert_eq!(entry.po_ref, "");
        assert_eq!(entry.status, "RECV");
        assert_eq!(entry.note, "");
    }
}
