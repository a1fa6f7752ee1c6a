// ==========================================
// 材料跟踪系统 - 项目（已保存的报告）
// ==========================================
// 用途: 存储层读写的最小单元
// ==========================================

use crate::domain::report::DashboardReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,          // UUID
    pub name: String,                // 项目名称（用户输入）
    pub source_file: Option<String>, // 源文件名
    pub report: DashboardReport,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// 创建新项目（自动生成 UUID 和时间戳）
    pub fn new(name: impl Into<String>, source_file: Option<String>, report: DashboardReport) -> Self {
        let now = Utc::now();
        Self {
            project_id: Uuid::new_v4().to_string(),
            name: name.into(),
            source_file,
            report,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
