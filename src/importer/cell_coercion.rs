// ==========================================
// 材料跟踪系统 - 单元格转换器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值转换 / 日期转换
// 红线: 转换失败 → None（不是 0，也不是错误）
// ==========================================

use crate::importer::table::Cell;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Excel 序列日期的纪元（1900 日期系统，含闰年 bug 修正）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Excel 序列日期允许范围（1900-01-01 ~ 9999-12-31）
const EXCEL_SERIAL_MIN: f64 = 1.0;
const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

/// 可识别的纯日期格式（按优先级）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// 可识别的日期时间格式（按优先级）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

pub struct CellCoercer;

impl CellCoercer {
    /// 标准化文本（TRIM，空白 → None）
    pub fn normalize_text(&self, cell: &Cell) -> Option<String> {
        if cell.is_blank() {
            return None;
        }
        let text = cell.display();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 数值转换
    ///
    /// # 规则
    /// - 数值单元格 → 原值（非有限值 → None）
    /// - 文本 → 严格解析；单个逗号作为小数点（"2,5" → 2.5）
    /// - 其余（空、布尔、日期、无法解析的文本）→ None
    pub fn coerce_number(&self, cell: &Cell) -> Option<f64> {
        match cell {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => parse_number_text(s),
            _ => None,
        }
    }

    /// 日期转换
    ///
    /// # 规则
    /// - 日期单元格 → 日期部分
    /// - 数值单元格 → 按 Excel 序列日期解释（超出范围 → None）
    /// - 文本 → 依次尝试 DATE_FORMATS / DATETIME_FORMATS
    pub fn coerce_date(&self, cell: &Cell) -> Option<NaiveDate> {
        match cell {
            Cell::DateTime(dt) => Some(dt.date()),
            Cell::Number(n) => excel_serial_to_datetime(*n).map(|dt| dt.date()),
            Cell::Text(s) => parse_date_text(s),
            _ => None,
        }
    }
}

fn parse_number_text(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = trimmed.parse::<f64>().ok().or_else(|| {
        // 西语区小数写法: "2,5"
        let mut parts = trimmed.splitn(2, ',');
        let int_part = parts.next()?;
        let frac_part = parts.next()?;
        let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        let int_digits = int_part.strip_prefix('-').unwrap_or(int_part);
        if is_digits(int_digits) && is_digits(frac_part) {
            format!("{}.{}", int_part, frac_part).parse::<f64>().ok()
        } else {
            None
        }
    })?;

    // "NaN" / "inf" 能被 parse 接受，但不是有效数值
    if parsed.is_finite() {
        Some(parsed)
    } else {
        None
    }
}

fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Excel 序列日期 → 日期时间
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(EXCEL_SERIAL_MIN..=EXCEL_SERIAL_MAX).contains(&serial) {
        return None;
    }

    let (y, m, d) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;

    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}
