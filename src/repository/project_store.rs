// ==========================================
// 材料跟踪系统 - 项目存储接口
// ==========================================
// 职责: 整表读写项目列表（load list / save list）
// 红线: 存储不含业务逻辑，分类器不依赖存储
// ==========================================

use crate::domain::project::Project;
use crate::repository::error::RepositoryResult;

/// 项目存储
///
/// 实现方只需保证 save 之后的 load 返回同样的列表（含顺序）。
pub trait ProjectStore: Send + Sync {
    /// 读取全部项目（存储为空时返回空列表）
    fn load(&self) -> RepositoryResult<Vec<Project>>;

    /// 以给定列表整体替换存储内容
    fn save(&self, projects: &[Project]) -> RepositoryResult<()>;
}
