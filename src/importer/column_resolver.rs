// ==========================================
// 材料跟踪系统 - 列绑定与解析
// ==========================================
// 职责: 六个业务字段 → 表格列位置（加载时解析一次）
// 红线: 缺列直接失败（SchemaError），不输出部分结果
// ==========================================

use crate::importer::error::SchemaError;
use crate::importer::table::RawTable;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ColumnField - 业务字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnField {
    RequisitionId,
    Quantity,
    Description,
    PoRef,
    ArrivalDate,
    Status,
}

impl ColumnField {
    pub const ALL: [ColumnField; 6] = [
        ColumnField::RequisitionId,
        ColumnField::Quantity,
        ColumnField::Description,
        ColumnField::PoRef,
        ColumnField::ArrivalDate,
        ColumnField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnField::RequisitionId => "requisition_id",
            ColumnField::Quantity => "quantity",
            ColumnField::Description => "description",
            ColumnField::PoRef => "po_ref",
            ColumnField::ArrivalDate => "arrival_date",
            ColumnField::Status => "status",
        }
    }

    /// 默认列名（最新版驾驶舱使用的表头）
    pub fn default_header(&self) -> &'static str {
        match self {
            ColumnField::RequisitionId => "No. S.C.",
            ColumnField::Quantity => "CANT ITEM S.C.",
            ColumnField::Description => "DESCRIPCION DE LA PARTIDA",
            ColumnField::PoRef => "No. O.C.",
            ColumnField::ArrivalDate => "FECHA DE LLEGADA",
            ColumnField::Status => "ESTATUS GRN",
        }
    }
}

impl fmt::Display for ColumnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColumnField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| format!("campo desconocido: {}", s))
    }
}

// ==========================================
// ColumnBinding - 按列名或按位置绑定
// ==========================================
// JSON: 数字 → 位置（0 起），字符串 → 列名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnBinding {
    Position(usize),
    Name(String),
}

impl ColumnBinding {
    pub fn name(name: impl Into<String>) -> Self {
        ColumnBinding::Name(name.into())
    }
}

impl fmt::Display for ColumnBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnBinding::Position(p) => write!(f, "#{}", p),
            ColumnBinding::Name(n) => f.write_str(n),
        }
    }
}

impl std::str::FromStr for ColumnBinding {
    type Err = String;

    /// "#14" → Position(14)，其它 → Name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("columna vacía".to_string());
        }
        match trimmed.strip_prefix('#') {
            Some(pos) => pos
                .parse::<usize>()
                .map(ColumnBinding::Position)
                .map_err(|_| format!("posición de columna inválida: {}", trimmed)),
            None => Ok(ColumnBinding::Name(trimmed.to_string())),
        }
    }
}

// ==========================================
// ColumnSchema - 六个字段的绑定
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub requisition_id: ColumnBinding,
    pub quantity: ColumnBinding,
    pub description: ColumnBinding,
    pub po_ref: ColumnBinding,
    pub arrival_date: ColumnBinding,
    pub status: ColumnBinding,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        let named = |f: ColumnField| ColumnBinding::name(f.default_header());
        Self {
            requisition_id: named(ColumnField::RequisitionId),
            quantity: named(ColumnField::Quantity),
            description: named(ColumnField::Description),
            po_ref: named(ColumnField::PoRef),
            arrival_date: named(ColumnField::ArrivalDate),
            status: named(ColumnField::Status),
        }
    }
}

impl ColumnSchema {
    pub fn binding(&self, field: ColumnField) -> &ColumnBinding {
        match field {
            ColumnField::RequisitionId => &self.requisition_id,
            ColumnField::Quantity => &self.quantity,
            ColumnField::Description => &self.description,
            ColumnField::PoRef => &self.po_ref,
            ColumnField::ArrivalDate => &self.arrival_date,
            ColumnField::Status => &self.status,
        }
    }

    pub fn set_binding(&mut self, field: ColumnField, binding: ColumnBinding) {
        match field {
            ColumnField::RequisitionId => self.requisition_id = binding,
            ColumnField::Quantity => self.quantity = binding,
            ColumnField::Description => self.description = binding,
            ColumnField::PoRef => self.po_ref = binding,
            ColumnField::ArrivalDate => self.arrival_date = binding,
            ColumnField::Status => self.status = binding,
        }
    }

    /// 按位置绑定时所需的最少列数
    pub fn min_column_count(&self) -> usize {
        ColumnField::ALL
            .iter()
            .filter_map(|f| match self.binding(*f) {
                ColumnBinding::Position(p) => Some(p + 1),
                ColumnBinding::Name(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// 解析为列位置
    ///
    /// # 返回
    /// - Err(MissingColumns): 按列名绑定但表头中不存在
    /// - Err(TooFewColumns): 按位置绑定但表格列数不足
    pub fn resolve(&self, table: &RawTable) -> Result<ResolvedColumns, SchemaError> {
        let mut missing = Vec::new();
        let mut indices = [0usize; 6];

        for (slot, field) in ColumnField::ALL.iter().enumerate() {
            match self.binding(*field) {
                ColumnBinding::Position(p) => indices[slot] = *p,
                ColumnBinding::Name(name) => match table.column_index(name) {
                    Some(idx) => indices[slot] = idx,
                    None => missing.push(name.clone()),
                },
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns { missing });
        }

        let required = self.min_column_count();
        if required > table.column_count() {
            return Err(SchemaError::TooFewColumns {
                required,
                actual: table.column_count(),
            });
        }

        Ok(ResolvedColumns {
            requisition_id: indices[0],
            quantity: indices[1],
            description: indices[2],
            po_ref: indices[3],
            arrival_date: indices[4],
            status: indices[5],
        })
    }
}

/// 已解析的列位置（0 起）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub requisition_id: usize,
    pub quantity: usize,
    pub description: usize,
    pub po_ref: usize,
    pub arrival_date: usize,
    pub status: usize,
}
