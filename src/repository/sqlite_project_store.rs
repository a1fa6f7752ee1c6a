// ==========================================
// 材料跟踪系统 - SQLite 项目存储
// ==========================================
// 职责: 管理 project 表
// 说明: save 在单个事务内整体替换；payload_json 保存完整项目
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::project::Project;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::project_store::ProjectStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub struct SqliteProjectStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProjectStore {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_table()?;
        Ok(store)
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        let store = Self { conn };
        store.ensure_table()?;
        Ok(store)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS project (
              project_id TEXT PRIMARY KEY,
              position INTEGER NOT NULL,
              name TEXT NOT NULL,
              source_file TEXT,
              payload_json TEXT NOT NULL,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_project_position
              ON project(position);
            "#,
        )?;
        Ok(())
    }

    /// 按名称查找项目 ID（最早保存的优先）
    pub fn find_id_by_name(&self, name: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let id = conn
            .query_row(
                "SELECT project_id FROM project WHERE name = ?1 ORDER BY position LIMIT 1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(id)
    }
}

impl ProjectStore for SqliteProjectStore {
    fn load(&self) -> RepositoryResult<Vec<Project>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT payload_json FROM project ORDER BY position")?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let projects = payloads
            .iter()
            .map(|payload| serde_json::from_str::<Project>(payload))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = projects.len(), "项目加载完成");
        Ok(projects)
    }

    fn save(&self, projects: &[Project]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM project", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO project (
                  project_id, position, name, source_file, payload_json, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for (position, project) in projects.iter().enumerate() {
                let payload = serde_json::to_string(project)?;
                stmt.execute(params![
                    project.project_id,
                    position as i64,
                    project.name,
                    project.source_file,
                    payload,
                    project.created_at.to_rfc3339(),
                    project.updated_at.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(count = projects.len(), "项目保存完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let conn = Connection::open_in_memory().unwrap();
        let store = SqliteProjectStore::from_connection(Arc::new(Mutex::new(conn))).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.find_id_by_name("x").unwrap(), None);
    }
}
