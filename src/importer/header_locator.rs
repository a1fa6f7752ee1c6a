// ==========================================
// 材料跟踪系统 - 表头定位器
// ==========================================
// 职责: 在原始单元格矩阵中定位真正的表头行
// 支持: 关键字扫描 / 固定偏移
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::table::{header_key, Cell, RawRow, RawTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 文件解析后的原始矩阵（含表头之前的标题/空行）
pub type SheetGrid = Vec<Vec<Cell>>;

/// 默认扫描关键字
pub const DEFAULT_HEADER_PHRASE: &str = "No. S.C.";

/// 默认扫描行数
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeaderLocator {
    /// 在前 max_rows 行中查找包含 phrase 单元格的第一行
    ScanFor { phrase: String, max_rows: usize },
    /// 表头位于固定行（0 起）
    FixedOffset { row: usize },
}

impl Default for HeaderLocator {
    fn default() -> Self {
        HeaderLocator::ScanFor {
            phrase: DEFAULT_HEADER_PHRASE.to_string(),
            max_rows: DEFAULT_HEADER_SCAN_ROWS,
        }
    }
}

impl HeaderLocator {
    /// 定位表头行索引（0 起）
    pub fn find_header_row(&self, grid: &[Vec<Cell>]) -> ImportResult<usize> {
        if grid.is_empty() {
            return Err(ImportError::EmptySheet);
        }

        match self {
            HeaderLocator::ScanFor { phrase, max_rows } => {
                let key = header_key(phrase);
                let scanned = (*max_rows).min(grid.len());
                grid.iter()
                    .take(scanned)
                    .position(|row| {
                        row.iter()
                            .any(|cell| !cell.is_blank() && header_key(&cell.display()) == key)
                    })
                    .ok_or_else(|| ImportError::HeaderNotFound {
                        phrase: phrase.clone(),
                        scanned,
                    })
            }
            HeaderLocator::FixedOffset { row } => {
                if *row < grid.len() {
                    Ok(*row)
                } else {
                    Err(ImportError::HeaderOffsetOutOfRange {
                        offset: *row,
                        rows: grid.len(),
                    })
                }
            }
        }
    }

    /// 定位表头并构造 RawTable（表头之后的行为数据行）
    pub fn locate(&self, grid: SheetGrid) -> ImportResult<RawTable> {
        let header_idx = self.find_header_row(&grid)?;
        debug!(header_row = header_idx + 1, "表头定位完成");

        let mut rows_iter = grid.into_iter().enumerate().skip(header_idx);
        let headers = rows_iter
            .next()
            .map(|(_, cells)| cells.iter().map(Cell::display).collect())
            .unwrap_or_default();

        let rows = rows_iter
            .map(|(idx, cells)| RawRow::new(idx + 1, cells))
            .collect();

        Ok(RawTable::new(headers, rows))
    }
}
