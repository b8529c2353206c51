use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::parsing::normalize::normalize_label;

/// A single spreadsheet cell after ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Number(Decimal),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Text rendering of the cell, `None` for empty or whitespace-only cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(n.normalize().to_string()),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        CellValue::Number(d)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Number(Decimal::from(i))
    }
}

/// A named sheet: header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Table {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Table {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Index of the first column whose header equals one of `aliases`
    /// (trimmed, case-insensitive).
    pub fn find_column(&self, aliases: &[String]) -> Option<usize> {
        find_column(&self.columns, aliases)
    }

    /// Cell at `(row, col)`; out-of-range positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Header lookup shared by the classifier and the table helpers.
pub fn find_column(columns: &[String], aliases: &[String]) -> Option<usize> {
    columns.iter().position(|c| {
        let header = normalize_label(c);
        aliases.iter().any(|a| normalize_label(a) == header)
    })
}

/// All sheets of an uploaded workbook, in workbook order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Table>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnergyUnit {
    #[serde(rename = "kWh")]
    Kwh,
    #[serde(rename = "m³", alias = "m3")]
    CubicMeter,
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyUnit::Kwh => write!(f, "kWh"),
            EnergyUnit::CubicMeter => write!(f, "m³"),
        }
    }
}

/// Origin of an energy carrier: renewable ("green") or conventional ("grey").
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceColor {
    #[default]
    #[serde(alias = "groen")]
    Green,
    #[serde(alias = "grijs")]
    Grey,
}

impl fmt::Display for SourceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceColor::Green => write!(f, "green"),
            SourceColor::Grey => write!(f, "grey"),
        }
    }
}

impl FromStr for SourceColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "green" | "groen" => Ok(SourceColor::Green),
            "grey" | "gray" | "grijs" => Ok(SourceColor::Grey),
            other => Err(format!("unknown color '{other}' (expected green or grey)")),
        }
    }
}

/// Unit of a consumption quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Energy(EnergyUnit),
    Liter,
    Other(String),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Energy(u) => write!(f, "{u}"),
            Unit::Liter => write!(f, "L"),
            Unit::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl Unit {
    pub fn from_str_loose(s: &str) -> Option<Unit> {
        let raw = s.trim();
        if raw.is_empty() {
            return None;
        }
        let unit = match raw.to_lowercase().as_str() {
            "kwh" => Unit::Energy(EnergyUnit::Kwh),
            "m³" | "m3" => Unit::Energy(EnergyUnit::CubicMeter),
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            _ => Unit::Other(raw.to_string()),
        };
        Some(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unit_from_str_loose() {
        assert_eq!(
            Unit::from_str_loose("kWh"),
            Some(Unit::Energy(EnergyUnit::Kwh))
        );
        assert_eq!(
            Unit::from_str_loose(" m³ "),
            Some(Unit::Energy(EnergyUnit::CubicMeter))
        );
        assert_eq!(Unit::from_str_loose("L"), Some(Unit::Liter));
        assert_eq!(Unit::from_str_loose("kg"), Some(Unit::Other("kg".into())));
        assert_eq!(Unit::from_str_loose("  "), None);
    }

    #[test]
    fn color_accepts_dutch_names() {
        assert_eq!("Groen".parse::<SourceColor>(), Ok(SourceColor::Green));
        assert_eq!("grijs".parse::<SourceColor>(), Ok(SourceColor::Grey));
        assert!("blue".parse::<SourceColor>().is_err());
    }

    #[test]
    fn cell_text_trims_and_skips_blank() {
        assert_eq!(CellValue::from("  Diesel ").as_text().as_deref(), Some("Diesel"));
        assert!(CellValue::from("   ").is_missing());
        assert_eq!(CellValue::Number(dec!(95.0)).as_text().as_deref(), Some("95"));
    }

    #[test]
    fn find_column_is_case_insensitive() {
        let table = Table::new("s", &["Merk", " Brandstof ", "Brandstof p/j"]);
        assert_eq!(table.find_column(&["brandstof".to_string()]), Some(1));
        assert_eq!(table.find_column(&["brandstof p/j".to_string()]), Some(2));
        assert_eq!(table.find_column(&["aantal".to_string()]), None);
    }
}
