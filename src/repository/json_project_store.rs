// ==========================================
// 材料跟踪系统 - JSON 文件项目存储
// ==========================================
// 存储: 单个 JSON 数组文件
// 说明: 文件不存在视为空列表；写入先落临时文件再 rename
// ==========================================

use crate::domain::project::Project;
use crate::repository::error::RepositoryResult;
use crate::repository::project_store::ProjectStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonFileProjectStore {
    path: PathBuf,
}

impl JsonFileProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "projects.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProjectStore for JsonFileProjectStore {
    fn load(&self) -> RepositoryResult<Vec<Project>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "存储文件不存在，返回空列表");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let projects: Vec<Project> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), count = projects.len(), "项目加载完成");
        Ok(projects)
    }

    fn save(&self, projects: &[Project]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(projects)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), count = projects.len(), "项目保存完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileProjectStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileProjectStore::new(dir.path().join("sub").join("projects.json"));
        store.save(&[]).unwrap();

        assert!(store.path().exists());
        assert!(!dir.path().join("sub").join("projects.json.tmp").exists());
        assert!(store.load().unwrap().is_empty());
    }
}
