// ==========================================
// 材料跟踪系统 - 领域类型定义
// ==========================================
// 职责: 分类规则的策略枚举（收货规则 / 工作清单规则）
// 红线: 每个配置只能启用一种收货规则
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==========================================
// 收货规则 (Received Rule)
// ==========================================
// 判定一行是否"已收货"（ESTATUS GRN）
// 序列化格式: {"prefix": "RE"} 或 {"exact": "RECV"}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReceivedRuleRepr", into = "ReceivedRuleRepr")]
pub enum ReceivedRule {
    /// 状态码 TRIM + UPPER 后以该前缀开头
    Prefix(String),
    /// 状态码 TRIM 后与该字面量完全相等
    Exact(String),
}

/// 收货规则构造错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceivedRuleError {
    #[error("no se puede configurar prefijo y literal exacto a la vez (prefix={prefix}, exact={exact})")]
    Conflicting { prefix: String, exact: String },

    #[error("falta la regla de recibido: configure un prefijo o un literal exacto")]
    Missing,

    #[error("la regla de recibido no puede ser vacía")]
    EmptyLiteral,
}

impl ReceivedRule {
    /// 由两个可选配置项构造规则
    ///
    /// # 规则
    /// - 只有 prefix → Prefix
    /// - 只有 exact → Exact
    /// - 两者都有 → Conflicting
    /// - 两者都无 → Missing
    pub fn from_parts(
        prefix: Option<String>,
        exact: Option<String>,
    ) -> Result<Self, ReceivedRuleError> {
        let prefix = prefix.map(|p| p.trim().to_string());
        let exact = exact.map(|e| e.trim().to_string());

        match (prefix, exact) {
            (Some(prefix), Some(exact)) => Err(ReceivedRuleError::Conflicting { prefix, exact }),
            (Some(prefix), None) if prefix.is_empty() => Err(ReceivedRuleError::EmptyLiteral),
            (None, Some(exact)) if exact.is_empty() => Err(ReceivedRuleError::EmptyLiteral),
            (Some(prefix), None) => Ok(ReceivedRule::Prefix(prefix)),
            (None, Some(exact)) => Ok(ReceivedRule::Exact(exact)),
            (None, None) => Err(ReceivedRuleError::Missing),
        }
    }

    pub fn literal(&self) -> &str {
        match self {
            ReceivedRule::Prefix(p) => p,
            ReceivedRule::Exact(e) => e,
        }
    }
}

impl Default for ReceivedRule {
    fn default() -> Self {
        ReceivedRule::Exact("RECV".to_string())
    }
}

impl fmt::Display for ReceivedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceivedRule::Prefix(p) => write!(f, "prefix:{}", p),
            ReceivedRule::Exact(e) => write!(f, "exact:{}", e),
        }
    }
}

/// 收货规则的扁平序列化形式（配置文件使用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceivedRuleRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,
}

impl TryFrom<ReceivedRuleRepr> for ReceivedRule {
    type Error = ReceivedRuleError;

    fn try_from(repr: ReceivedRuleRepr) -> Result<Self, Self::Error> {
        ReceivedRule::from_parts(repr.prefix, repr.exact)
    }
}

impl From<ReceivedRule> for ReceivedRuleRepr {
    fn from(rule: ReceivedRule) -> Self {
        match rule {
            ReceivedRule::Prefix(p) => ReceivedRuleRepr {
                prefix: Some(p),
                exact: None,
            },
            ReceivedRule::Exact(e) => ReceivedRuleRepr {
                prefix: None,
                exact: Some(e),
            },
        }
    }
}

// ==========================================
// 工作清单规则 (Worklist Rule)
// ==========================================
// 决定哪些有效行进入 tabla_resumen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorklistRule {
    Received,                 // 仅已收货
    ReceivedExcludingService, // 已收货且非服务行
    HasArrivalDate,           // 到货日期可解析
    AllRequested,             // 所有有数量的行
    AllRows,                  // 不额外过滤
}

impl WorklistRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorklistRule::Received => "received",
            WorklistRule::ReceivedExcludingService => "received_excluding_service",
            WorklistRule::HasArrivalDate => "has_arrival_date",
            WorklistRule::AllRequested => "all_requested",
            WorklistRule::AllRows => "all_rows",
        }
    }
}

impl Default for WorklistRule {
    fn default() -> Self {
        WorklistRule::Received
    }
}

impl fmt::Display for WorklistRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorklistRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "received" => Ok(WorklistRule::Received),
            "received_excluding_service" | "received-excluding-service" => {
                Ok(WorklistRule::ReceivedExcludingService)
            }
            "has_arrival_date" | "has-arrival-date" => Ok(WorklistRule::HasArrivalDate),
            "all_requested" | "all-requested" => Ok(WorklistRule::AllRequested),
            "all_rows" | "all-rows" | "identity" => Ok(WorklistRule::AllRows),
            other => Err(format!("regla de lista desconocida: {}", other)),
        }
    }
}
