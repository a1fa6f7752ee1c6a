// ==========================================
// 材料跟踪系统 - 内存表格模型
// ==========================================
// 职责: 文件解析结果的统一表示（与 Excel/CSV 无关）
// 说明: 列名只在建表时标准化一次
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 单元格值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// 由文本构造（空白文本 → Empty）
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 显示文本（整数值不带小数点，空单元格为 ""）
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Cell::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.date().format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 标准化列名（TRIM + 合并连续空白）
pub fn normalize_header(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 列名比较键（标准化 + 大写）
pub fn header_key(name: &str) -> String {
    normalize_header(name).to_uppercase()
}

// ==========================================
// RawRow - 表头之后的一行数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub source_row: usize, // 源文件行号（1 起）
    pub cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(source_row: usize, cells: Vec<Cell>) -> Self {
        Self { source_row, cells }
    }

    /// 按位置取单元格（越界视为空）
    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

// ==========================================
// RawTable - 已定位表头的表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// 构造表格：标准化列名，表头宽度补齐到最宽数据行，跳过空白行
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        let mut headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let rows: Vec<RawRow> = rows.into_iter().filter(|r| !r.is_blank()).collect();

        let widest = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        if widest > headers.len() {
            headers.resize(widest, String::new());
        }

        Self { headers, rows }
    }

    /// 由文本矩阵构造（测试与内存调用方使用）
    pub fn from_text_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let headers = headers
            .into_iter()
            .map(|h| h.as_ref().to_string())
            .collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| RawRow::new(idx + 2, row.into_iter().map(Cell::text).collect()))
            .collect();
        Self::new(headers, rows)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 按列名查找位置（忽略大小写与多余空白，取第一个匹配）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let key = header_key(name);
        self.headers.iter().position(|h| header_key(h) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(1001.0).display(), "1001");
        assert_eq!(Cell::Number(2.5).display(), "2.5");
        assert_eq!(Cell::text("  RECV ").display(), "RECV");
        assert_eq!(Cell::Empty.display(), "");

        let midnight = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Cell::DateTime(midnight).display(), "2024-02-29");
    }

    #[test]
    fn test_blank_text_becomes_empty() {
        assert_eq!(Cell::text("   "), Cell::Empty);
    }

    #[test]
    fn test_table_normalizes_headers_and_skips_blank_rows() {
        let table = RawTable::from_text_rows(
            ["  No.  S.C. ", "CANT ITEM S.C."],
            vec![vec!["1", "2"], vec!["", " "], vec!["3", "4"]],
        );

        assert_eq!(table.headers[0], "No. S.C.");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_index("no. s.c."), Some(0));
        assert_eq!(table.column_index("ESTATUS GRN"), None);
    }

    #[test]
    fn test_header_padded_to_widest_row() {
        let table = RawTable::from_text_rows(["A"], vec![vec!["1", "2", "3"]]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows[0].cell(7), &Cell::Empty);
    }
}
