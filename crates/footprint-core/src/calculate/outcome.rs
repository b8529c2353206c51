use crate::classify::engine::ModelKind;
use crate::factors::schema::{FactorKey, FactorResolution};
use crate::model::Unit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One costed line of the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRow {
    /// Sheet the row was computed from.
    pub sheet: String,
    /// Display label, e.g. "Transport-Diesel" or the equipment sheet name.
    pub label: String,
    /// Canonical category key ("diesel", "electricity", ...) for fuel rows,
    /// the sheet name for equipment rows.
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// Store address the factor was read from, if the row resolved one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_key: Option<FactorKey>,
    pub resolution: FactorResolution,
    /// kg CO₂-eq per unit.
    pub factor: Decimal,
    pub quantity: Decimal,
    /// kg CO₂-eq.
    pub footprint: Decimal,
}

/// Result of running one sheet through the classifier and calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetResult {
    pub sheet: String,
    pub model: ModelKind,
    /// Headers of the sheet, kept so unrecognized sheets can be reported.
    pub columns: Vec<String>,
    pub rows: Vec<ConsumptionRow>,
}

impl SheetResult {
    pub fn is_recognized(&self) -> bool {
        self.model != ModelKind::Unrecognized
    }

    pub fn total_quantity(&self) -> Decimal {
        self.rows
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.quantity))
    }

    pub fn total_footprint(&self) -> Decimal {
        crate::aggregate::total_footprint(&self.rows)
    }
}

/// Full result of a calculation pass over one workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintReport {
    pub sheets: Vec<SheetResult>,
    /// Sum of every row footprint, kg CO₂-eq.
    pub total_footprint: Decimal,
}

impl FootprintReport {
    pub fn from_sheets(sheets: Vec<SheetResult>) -> Self {
        let total_footprint = crate::aggregate::total_footprint(sheets.iter().flat_map(|s| &s.rows));
        FootprintReport {
            sheets,
            total_footprint,
        }
    }

    /// All result rows in sheet order.
    pub fn rows(&self) -> impl Iterator<Item = &ConsumptionRow> {
        self.sheets.iter().flat_map(|s| s.rows.iter())
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &SheetResult> {
        self.sheets.iter().filter(|s| !s.is_recognized())
    }

    /// Rows whose factor lookup fell back to zero.
    pub fn defaulted_rows(&self) -> impl Iterator<Item = &ConsumptionRow> {
        self.rows().filter(|r| r.resolution.is_defaulted())
    }
}
