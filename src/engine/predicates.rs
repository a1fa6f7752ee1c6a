// ==========================================
// 材料跟踪系统 - 行谓词（策略表）
// ==========================================
// 职责: 收货谓词 / 工作清单谓词
// 红线: 同一配置只启用一种收货规则（由 ReceivedRule 枚举保证）
// ==========================================

use crate::domain::record::ProcurementRecord;
use crate::domain::types::{ReceivedRule, WorklistRule};

/// 行谓词
pub trait RowPredicate: Send + Sync {
    fn matches(&self, record: &ProcurementRecord) -> bool;
}

// ==========================================
// 收货谓词
// ==========================================

/// 状态码是否满足收货规则
///
/// # 规则
/// - Prefix: TRIM + UPPER 后以（大写）前缀开头
/// - Exact: TRIM 后与字面量完全相等
/// - 状态缺失 → 未收货
pub fn status_is_received(rule: &ReceivedRule, status: Option<&str>) -> bool {
    let status = match status.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return false,
    };

    match rule {
        ReceivedRule::Prefix(prefix) => status
            .to_uppercase()
            .starts_with(&prefix.trim().to_uppercase()),
        ReceivedRule::Exact(literal) => status == literal.trim(),
    }
}

impl RowPredicate for ReceivedRule {
    fn matches(&self, record: &ProcurementRecord) -> bool {
        status_is_received(self, record.status.as_deref())
    }
}

// ==========================================
// 工作清单谓词
// ==========================================
pub struct WorklistPredicate {
    rule: WorklistRule,
    received: ReceivedRule,
    service_marker: String, // 已转大写
}

impl WorklistPredicate {
    pub fn new(rule: WorklistRule, received: ReceivedRule, service_marker: &str) -> Self {
        Self {
            rule,
            received,
            service_marker: service_marker.trim().to_uppercase(),
        }
    }

    pub fn rule(&self) -> WorklistRule {
        self.rule
    }

    /// 描述中包含服务标记（忽略大小写）
    pub fn is_service_line(&self, record: &ProcurementRecord) -> bool {
        record
            .description
            .as_deref()
            .map(|d| d.to_uppercase().contains(&self.service_marker))
            .unwrap_or(false)
    }
}

impl RowPredicate for WorklistPredicate {
    fn matches(&self, record: &ProcurementRecord) -> bool {
        match self.rule {
            WorklistRule::Received => self.received.matches(record),
            WorklistRule::ReceivedExcludingService => {
                self.received.matches(record) && !self.is_service_line(record)
            }
            WorklistRule::HasArrivalDate => record.arrival_date.is_some(),
            WorklistRule::AllRequested => record.quantity.is_some(),
            WorklistRule::AllRows => true,
        }
    }
}
