// ==========================================
// 材料跟踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 缺失的键取默认值，非法值直接报错
// ==========================================

use crate::config::classifier_config::ClassifierConfig;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::types::{ReceivedRule, WorklistRule};
use crate::importer::column_resolver::{ColumnBinding, ColumnField};
use crate::importer::header_locator::{HeaderLocator, DEFAULT_HEADER_PHRASE, DEFAULT_HEADER_SCAN_ROWS};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL DEFAULT 'global',
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        debug!(key = key, value = value, "配置已写入");
        Ok(())
    }

    /// 删除 global scope 的配置值
    pub fn delete_global_config_value(&self, key: &str) -> ConfigResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
        )?;
        Ok(affected > 0)
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    fn parse_usize(key: &str, value: &str) -> ConfigResult<usize> {
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::invalid(key, value, "se esperaba un entero no negativo"))
    }

    // ===== 分类器配置 =====

    /// 组装分类器配置
    ///
    /// # 规则
    /// - received_prefix 与 received_exact 同时存在 → 配置错误
    /// - header_offset 存在时使用固定偏移，不能与 header_phrase 同时配置
    /// - column/<field> 值为列名或 "#位置"
    pub fn load_classifier_config(&self) -> ConfigResult<ClassifierConfig> {
        let mut config = ClassifierConfig::default();

        // 收货规则
        let prefix = self.get_global_config_value(config_keys::RECEIVED_PREFIX)?;
        let exact = self.get_global_config_value(config_keys::RECEIVED_EXACT)?;
        if prefix.is_some() || exact.is_some() {
            config.received_rule = ReceivedRule::from_parts(prefix, exact)?;
        }

        // 工作清单规则
        if let Some(value) = self.get_global_config_value(config_keys::WORKLIST_RULE)? {
            config.worklist_rule = value
                .parse::<WorklistRule>()
                .map_err(|message| ConfigError::invalid(config_keys::WORKLIST_RULE, &value, message))?;
        }

        if let Some(value) = self.get_global_config_value(config_keys::SERVICE_MARKER)? {
            config.service_marker = value;
        }

        // 表头定位
        let offset = self.get_global_config_value(config_keys::HEADER_OFFSET)?;
        let phrase = self.get_global_config_value(config_keys::HEADER_PHRASE)?;
        let scan_rows = self.get_global_config_value(config_keys::HEADER_SCAN_ROWS)?;
        config.header = match (offset, phrase) {
            (Some(offset), Some(phrase)) => {
                return Err(ConfigError::invalid(
                    config_keys::HEADER_OFFSET,
                    offset,
                    format!("no puede combinarse con header_phrase ({})", phrase),
                ));
            }
            (Some(offset), None) => HeaderLocator::FixedOffset {
                row: Self::parse_usize(config_keys::HEADER_OFFSET, &offset)?,
            },
            (None, phrase) => HeaderLocator::ScanFor {
                phrase: phrase.unwrap_or_else(|| DEFAULT_HEADER_PHRASE.to_string()),
                max_rows: match scan_rows {
                    Some(v) => Self::parse_usize(config_keys::HEADER_SCAN_ROWS, &v)?,
                    None => DEFAULT_HEADER_SCAN_ROWS,
                },
            },
        };

        config.sheet_name = self
            .get_global_config_value(config_keys::SHEET_NAME)?
            .filter(|s| !s.trim().is_empty());

        if let Some(value) = self.get_global_config_value(config_keys::PREVIEW_LIMIT)? {
            config.preview_limit = Self::parse_usize(config_keys::PREVIEW_LIMIT, &value)?;
        }

        // 列绑定
        for field in ColumnField::ALL {
            let key = config_keys::column_key(field);
            if let Some(value) = self.get_global_config_value(&key)? {
                let binding = value
                    .parse::<ColumnBinding>()
                    .map_err(|message| ConfigError::invalid(&key, &value, message))?;
                config.columns.set_binding(field, binding);
            }
        }

        config.validate()?;
        info!(
            received_rule = %config.received_rule,
            worklist_rule = %config.worklist_rule,
            "分类器配置加载完成"
        );
        Ok(config)
    }

    /// 保存分类器配置（覆盖所有相关键，事务化）
    pub fn save_classifier_config(&self, config: &ClassifierConfig) -> ConfigResult<()> {
        config.validate()?;

        let mut entries: Vec<(String, Option<String>)> = Vec::new();
        let (prefix, exact) = match &config.received_rule {
            ReceivedRule::Prefix(p) => (Some(p.clone()), None),
            ReceivedRule::Exact(e) => (None, Some(e.clone())),
        };
        entries.push((config_keys::RECEIVED_PREFIX.to_string(), prefix));
        entries.push((config_keys::RECEIVED_EXACT.to_string(), exact));
        entries.push((
            config_keys::WORKLIST_RULE.to_string(),
            Some(config.worklist_rule.as_str().to_string()),
        ));
        entries.push((
            config_keys::SERVICE_MARKER.to_string(),
            Some(config.service_marker.clone()),
        ));

        match &config.header {
            HeaderLocator::ScanFor { phrase, max_rows } => {
                entries.push((config_keys::HEADER_OFFSET.to_string(), None));
                entries.push((config_keys::HEADER_PHRASE.to_string(), Some(phrase.clone())));
                entries.push((
                    config_keys::HEADER_SCAN_ROWS.to_string(),
                    Some(max_rows.to_string()),
                ));
            }
            HeaderLocator::FixedOffset { row } => {
                entries.push((config_keys::HEADER_OFFSET.to_string(), Some(row.to_string())));
                entries.push((config_keys::HEADER_PHRASE.to_string(), None));
                entries.push((config_keys::HEADER_SCAN_ROWS.to_string(), None));
            }
        }

        entries.push((config_keys::SHEET_NAME.to_string(), config.sheet_name.clone()));
        entries.push((
            config_keys::PREVIEW_LIMIT.to_string(),
            Some(config.preview_limit.to_string()),
        ));

        for field in ColumnField::ALL {
            let binding = config.columns.binding(field);
            let value = match binding {
                ColumnBinding::Position(p) => format!("#{}", p),
                ColumnBinding::Name(n) => n.clone(),
            };
            entries.push((config_keys::column_key(field), Some(value)));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        for (key, value) in &entries {
            match value {
                Some(v) => {
                    tx.execute(
                        "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                         ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                        params![GLOBAL_SCOPE, key, v],
                    )?;
                }
                None => {
                    tx.execute(
                        "DELETE FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                        params![GLOBAL_SCOPE, key],
                    )?;
                }
            }
        }
        tx.commit()?;

        info!(keys = entries.len(), "分类器配置已保存");
        Ok(())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    use crate::importer::column_resolver::ColumnField;

    // 收货规则（二选一）
    pub const RECEIVED_PREFIX: &str = "received_prefix";
    pub const RECEIVED_EXACT: &str = "received_exact";

    // 工作清单
    pub const WORKLIST_RULE: &str = "worklist_rule";
    pub const SERVICE_MARKER: &str = "service_marker";

    // 表头定位
    pub const HEADER_PHRASE: &str = "header_phrase";
    pub const HEADER_SCAN_ROWS: &str = "header_scan_rows";
    pub const HEADER_OFFSET: &str = "header_offset";

    // 读取
    pub const SHEET_NAME: &str = "sheet_name";
    pub const PREVIEW_LIMIT: &str = "preview_limit";

    // 列绑定: column/<field>
    pub const COLUMN_PREFIX: &str = "column/";

    pub fn column_key(field: ColumnField) -> String {
        format!("{}{}", COLUMN_PREFIX, field.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let config = manager().load_classifier_config().unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_conflicting_received_keys() {
        let m = manager();
        m.set_global_config_value(config_keys::RECEIVED_PREFIX, "RE").unwrap();
        m.set_global_config_value(config_keys::RECEIVED_EXACT, "RECV").unwrap();

        let err = m.load_classifier_config().unwrap_err();
        assert!(matches!(err, ConfigError::ReceivedRule(_)));
    }

    #[test]
    fn test_invalid_worklist_rule() {
        let m = manager();
        m.set_global_config_value(config_keys::WORKLIST_RULE, "todo").unwrap();

        let err = m.load_classifier_config().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "worklist_rule"));
    }

    #[test]
    fn test_header_offset_conflicts_with_phrase() {
        let m = manager();
        m.set_global_config_value(config_keys::HEADER_OFFSET, "3").unwrap();
        m.set_global_config_value(config_keys::HEADER_PHRASE, "No. S.C.").unwrap();
        assert!(m.load_classifier_config().is_err());

        m.delete_global_config_value(config_keys::HEADER_PHRASE).unwrap();
        let config = m.load_classifier_config().unwrap();
        assert_eq!(config.header, HeaderLocator::FixedOffset { row: 3 });
    }

    #[test]
    fn test_save_then_load() {
        let m = manager();
        let mut config = ClassifierConfig::default();
        config.received_rule = ReceivedRule::Prefix("RE".to_string());
        config.worklist_rule = WorklistRule::HasArrivalDate;
        config.columns.set_binding(ColumnField::Status, ColumnBinding::Position(14));
        config.header = HeaderLocator::FixedOffset { row: 2 };

        m.save_classifier_config(&config).unwrap();
        assert_eq!(m.load_classifier_config().unwrap(), config);

        let snapshot = m.get_config_snapshot().unwrap();
        assert_eq!(snapshot.get("column/status").map(String::as_str), Some("#14"));
        assert!(!snapshot.contains_key(config_keys::RECEIVED_EXACT));
    }
}
