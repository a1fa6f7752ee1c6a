// ==========================================
// 材料跟踪系统 - 分类引擎错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// 没有任何行的 No. S.C. 可转换为数值
    #[error("La tabla no contiene filas válidas (ninguna de {total_rows} filas tiene No. S.C. numérico)")]
    NoValidRows { total_rows: usize },
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;
