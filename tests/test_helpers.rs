// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、表格样本、文件生成
// ==========================================

#![allow(dead_code)]

use procurement_kpi::domain::ProcurementRecord;
use procurement_kpi::importer::RawTable;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 标准列名（与默认列绑定一致）
pub const STANDARD_HEADERS: [&str; 6] = [
    "No. S.C.",
    "CANT ITEM S.C.",
    "DESCRIPCION DE LA PARTIDA",
    "No. O.C.",
    "FECHA DE LLEGADA",
    "ESTATUS GRN",
];

/// 创建临时测试数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("ruta temporal no UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 构造一行: [No. S.C., CANT, DESCRIPCION, No. O.C., FECHA, ESTATUS]
pub fn row(id: &str, qty: &str, desc: &str, po: &str, arrival: &str, status: &str) -> Vec<String> {
    vec![id, qty, desc, po, arrival, status]
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// 由标准列名 + 行构造 RawTable
pub fn standard_table(rows: Vec<Vec<String>>) -> RawTable {
    RawTable::from_text_rows(STANDARD_HEADERS, rows)
}

/// 场景 A/B 的三行样本
pub fn scenario_rows() -> Vec<Vec<String>> {
    vec![
        row("1001", "5", "TUBO 2\"", "OC-77", "2024-03-15", "RECV"),
        row("1002", "3", "SERVICIO DE GRUA", "", "", "PEND"),
        row("X", "1", "NOTA", "", "", "RECV"),
    ]
}

/// 构造 ProcurementRecord（None = 单元格为空）
pub fn record(
    id: Option<f64>,
    qty: Option<f64>,
    po: Option<&str>,
    status: Option<&str>,
) -> ProcurementRecord {
    ProcurementRecord {
        requisition_id: id,
        requisition_label: id.map(|v| format!("{}", v)).unwrap_or_else(|| "X".to_string()),
        quantity: qty,
        quantity_label: qty.map(|v| format!("{}", v)).unwrap_or_default(),
        description: Some("MATERIAL".to_string()),
        po_ref: po.map(|s| s.to_string()),
        arrival_date: None,
        arrival_label: String::new(),
        status: status.map(|s| s.to_string()),
        source_row: 2,
    }
}

/// 写出 CSV 文件（分隔符 ','）
pub fn write_csv(dir: &Path, name: &str, headers: &[&str], rows: &[Vec<String>]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(headers).unwrap();
    for r in rows {
        writer.write_record(r).unwrap();
    }
    writer.flush().unwrap();
    path
}

/// 写出 .xlsx 文件
///
/// - preamble: 表头之前的说明行（模拟报表标题）
/// - 数量列写为数值单元格，其余为文本
pub fn write_xlsx(
    dir: &Path,
    name: &str,
    preamble: &[&str],
    headers: &[&str],
    rows: &[Vec<String>],
) -> PathBuf {
    let path = dir.join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let mut r: u32 = 0;
    for line in preamble {
        sheet.write_string(r, 0, *line).unwrap();
        r += 1;
    }
    for (c, h) in headers.iter().enumerate() {
        sheet.write_string(r, c as u16, *h).unwrap();
    }
    r += 1;

    for data in rows {
        for (c, value) in data.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(n) if c <= 1 => {
                    sheet.write_number(r, c as u16, n).unwrap();
                }
                _ => {
                    sheet.write_string(r, c as u16, value.as_str()).unwrap();
                }
            }
        }
        r += 1;
    }

    workbook.save(&path).unwrap();
    path
}
