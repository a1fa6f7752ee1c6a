// ==========================================
// 材料跟踪系统 - 分类器配置
// ==========================================
// 职责: 选择收货规则 / 工作清单规则 / 列绑定 / 表头定位
// 默认值: 与最新版驾驶舱一致（ESTATUS GRN == "RECV"，清单仅含已收货）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::{ReceivedRule, WorklistRule};
use crate::importer::column_resolver::ColumnSchema;
use crate::importer::header_locator::HeaderLocator;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 服务行标记（描述中包含即视为非材料行）
pub const DEFAULT_SERVICE_MARKER: &str = "SERVICIO";

/// data 预览的最大行数
pub const DEFAULT_PREVIEW_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub received_rule: ReceivedRule,
    pub worklist_rule: WorklistRule,
    pub service_marker: String,
    pub columns: ColumnSchema,
    pub header: HeaderLocator,
    pub sheet_name: Option<String>,
    pub preview_limit: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            received_rule: ReceivedRule::default(),
            worklist_rule: WorklistRule::default(),
            service_marker: DEFAULT_SERVICE_MARKER.to_string(),
            columns: ColumnSchema::default(),
            header: HeaderLocator::default(),
            sheet_name: None,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl ClassifierConfig {
    /// 从 JSON 字符串加载（缺省字段取默认值）
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: ClassifierConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 配置校验
    pub fn validate(&self) -> ConfigResult<()> {
        if self.received_rule.literal().trim().is_empty() {
            return Err(ConfigError::invalid(
                "received_rule",
                self.received_rule.to_string(),
                "la regla de recibido no puede ser vacía",
            ));
        }

        if self.service_marker.trim().is_empty() {
            return Err(ConfigError::invalid(
                "service_marker",
                &self.service_marker,
                "el marcador de servicio no puede ser vacío",
            ));
        }

        if self.preview_limit == 0 {
            return Err(ConfigError::invalid(
                "preview_limit",
                "0",
                "debe ser mayor que 0",
            ));
        }

        if let HeaderLocator::ScanFor { phrase, max_rows } = &self.header {
            if phrase.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "header_phrase",
                    phrase,
                    "la frase de encabezado no puede ser vacía",
                ));
            }
            if *max_rows == 0 {
                return Err(ConfigError::invalid(
                    "header_scan_rows",
                    "0",
                    "debe ser mayor que 0",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::column_resolver::{ColumnBinding, ColumnField};

    #[test]
    fn test_default_config_is_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.received_rule, ReceivedRule::Exact("RECV".to_string()));
        assert_eq!(config.worklist_rule, WorklistRule::Received);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ClassifierConfig::from_json_str(
            r#"{
                "received_rule": {"prefix": "RE"},
                "worklist_rule": "received_excluding_service",
                "columns": {
                    "requisition_id": 0, "quantity": 3, "description": 4,
                    "po_ref": 7, "arrival_date": 9, "status": 14
                },
                "header": {"mode": "fixed_offset", "row": 5}
            }"#,
        )
        .unwrap();

        assert_eq!(config.received_rule, ReceivedRule::Prefix("RE".to_string()));
        assert_eq!(config.worklist_rule, WorklistRule::ReceivedExcludingService);
        assert_eq!(
            config.columns.binding(ColumnField::Status),
            &ColumnBinding::Position(14)
        );
        assert_eq!(config.header, HeaderLocator::FixedOffset { row: 5 });
        assert_eq!(config.preview_limit, DEFAULT_PREVIEW_LIMIT);
    }

    #[test]
    fn test_mixed_received_rule_rejected() {
        let result = ClassifierConfig::from_json_str(
            r#"{"received_rule": {"prefix": "RE", "exact": "RECV"}}"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_preview_limit_rejected() {
        let result = ClassifierConfig::from_json_str(r#"{"preview_limit": 0}"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "preview_limit"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ClassifierConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(ClassifierConfig::from_json_str(&json).unwrap(), config);
    }
}
