// ==========================================
// 材料跟踪系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析（不识别表头，保留原始矩阵）
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV (.csv)
// ==========================================

use crate::importer::cell_coercion::excel_serial_to_datetime;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_locator::{SheetGrid, DEFAULT_HEADER_SCAN_ROWS};
use crate::importer::procurement_importer_trait::FileParser;
use crate::importer::table::Cell;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 猜测分隔符（';' 或 ','）
    ///
    /// 在前 DEFAULT_HEADER_SCAN_ROWS 个非空行中，选择使最多行具有相同
    /// 字段数的分隔符；表头之前的标题行不会单独决定结果。平局时使用 ','。
    fn sniff_delimiter(content: &[u8]) -> u8 {
        let lines: Vec<&[u8]> = content
            .split(|b| *b == b'\n')
            .filter(|line| line.iter().any(|b| !b.is_ascii_whitespace()))
            .take(DEFAULT_HEADER_SCAN_ROWS)
            .collect();

        if consistency_score(&lines, b';') > consistency_score(&lines, b',') {
            b';'
        } else {
            b','
        }
    }

    /// 解析内存中的 CSV 内容
    pub fn parse_bytes(&self, content: &[u8]) -> ImportResult<SheetGrid> {
        let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头由 HeaderLocator 定位
            .flexible(true) // 允许行长度不一致
            .delimiter(Self::sniff_delimiter(content))
            .from_reader(content);

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            grid.push(record.iter().map(Cell::text).collect());
        }
        Ok(grid)
    }
}

/// (具有相同分隔符个数的最多行数, 该个数)，只统计含分隔符的行
fn consistency_score(lines: &[&[u8]], delimiter: u8) -> (usize, usize) {
    let mut frequency: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        let count = count_unquoted(line, delimiter);
        if count > 0 {
            *frequency.entry(count).or_default() += 1;
        }
    }
    frequency
        .into_iter()
        .map(|(count, lines)| (lines, count))
        .max()
        .unwrap_or((0, 0))
}

/// 引号外的分隔符个数
fn count_unquoted(line: &[u8], delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &b in line {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

impl FileParser for CsvParser {
    fn parse_grid(&self, file_path: &Path) -> ImportResult<SheetGrid> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let content = std::fs::read(file_path)?;
        self.parse_bytes(&content)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ExcelParser {
    /// 指定工作表（None = 第一个）
    pub sheet_name: Option<String>,
}

impl ExcelParser {
    pub fn new(sheet_name: Option<String>) -> Self {
        Self { sheet_name }
    }
}

/// calamine 单元格 → Cell
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_datetime(serial)
                .map(Cell::DateTime)
                .unwrap_or(Cell::Number(serial))
        }
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(Cell::DateTime)
            .unwrap_or_else(|_| Cell::text(s)),
        // #N/A、#REF! 等公式错误按空值处理
        Data::Error(_) => Cell::Empty,
        other => Cell::text(other.to_string()),
    }
}

impl FileParser for ExcelParser {
    fn parse_grid(&self, file_path: &Path) -> ImportResult<SheetGrid> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match &self.sheet_name {
            Some(wanted) => sheet_names
                .iter()
                .find(|n| n.trim().eq_ignore_ascii_case(wanted.trim()))
                .cloned()
                .ok_or_else(|| ImportError::SheetNotFound(wanted.clone()))?,
            None => sheet_names.first().cloned().ok_or(ImportError::EmptySheet)?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // calamine 的 Range 从第一个非空单元格开始，需补齐前导行/列以保持列位置
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut grid: SheetGrid = vec![Vec::new(); row_offset];
        for data_row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(data_row.iter().map(cell_from_data));
            grid.push(cells);
        }

        debug!(sheet = %sheet_name, rows = grid.len(), "Excel 工作表读取完成");
        Ok(grid)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct UniversalFileParser {
    excel: ExcelParser,
}

impl UniversalFileParser {
    pub fn new(sheet_name: Option<String>) -> Self {
        Self {
            excel: ExcelParser::new(sheet_name),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_grid(&self, file_path: &Path) -> ImportResult<SheetGrid> {
        let ext = extension_of(file_path);
        match ext.as_str() {
            "csv" => CsvParser.parse_grid(file_path),
            e if EXCEL_EXTENSIONS.contains(&e) => self.excel.parse_grid(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::header_locator::HeaderLocator;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_csv_parser_keeps_rows_before_header() {
        let file = temp_csv("REPORTE,\nNo. S.C.,CANT ITEM S.C.\n1001,5\n");
        let grid = CsvParser.parse_grid(file.path()).unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][0], Cell::Text("No. S.C.".to_string()));
        assert_eq!(grid[2][1], Cell::Text("5".to_string()));
    }

    #[test]
    fn test_csv_semicolon_and_bom() {
        let grid = CsvParser
            .parse_bytes("\u{feff}No. S.C.;CANT ITEM S.C.\n1001;2,5\n".as_bytes())
            .unwrap();

        assert_eq!(grid[0][0], Cell::Text("No. S.C.".to_string()));
        assert_eq!(grid[1][1], Cell::Text("2,5".to_string()));
    }

    #[test]
    fn test_csv_semicolon_with_comma_in_title_row() {
        let content = "Obra: Planta Norte, Lima\nNo. S.C.;CANT ITEM S.C.\n1001;5\n";
        let grid = CsvParser.parse_bytes(content.as_bytes()).unwrap();

        assert_eq!(grid[1][0], Cell::Text("No. S.C.".to_string()));
        assert_eq!(grid[1][1], Cell::Text("CANT ITEM S.C.".to_string()));
        assert_eq!(grid[2][1], Cell::Text("5".to_string()));

        let table = HeaderLocator::default().locate(grid).unwrap();
        assert_eq!(table.headers[0], "No. S.C.");
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(CsvParser::sniff_delimiter(b"a,b,c\n1,2,3\n"), b',');
        assert_eq!(CsvParser::sniff_delimiter(b"a;b;c\n1;2,5;3\n"), b';');
        // 引号内的分隔符不计数
        assert_eq!(CsvParser::sniff_delimiter(b"a,b\n\"x;y;z\",1\n"), b',');
        assert_eq!(CsvParser::sniff_delimiter(b""), b',');
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_grid(Path::new("no_existe.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser::default().parse_grid(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(cell_from_data(&Data::String("  x ".to_string())), Cell::Text("x".to_string()));
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
    }
}
