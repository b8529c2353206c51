use crate::classify::vocabulary::ColumnVocabulary;
use crate::model::find_column;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column positions of a fuel-ledger sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuelColumns {
    pub fuel_type: usize,
    /// Missing quantity column means every group sums to zero.
    pub annual_fuel: Option<usize>,
    pub brand: Option<usize>,
    pub model: Option<usize>,
}

/// Column positions of a powered-equipment inventory sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentColumns {
    pub count: usize,
    pub power: usize,
    pub unit: usize,
    pub annual_hours: usize,
    pub brand: Option<usize>,
    pub model: Option<usize>,
}

/// Consumption model selected for a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetModel {
    Fuel(FuelColumns),
    Equipment(EquipmentColumns),
    Unrecognized,
}

impl SheetModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            SheetModel::Fuel(_) => ModelKind::Fuel,
            SheetModel::Equipment(_) => ModelKind::Equipment,
            SheetModel::Unrecognized => ModelKind::Unrecognized,
        }
    }
}

/// Column-free tag of a [`SheetModel`], for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Fuel,
    Equipment,
    Unrecognized,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Fuel => write!(f, "fuel ledger"),
            ModelKind::Equipment => write!(f, "equipment"),
            ModelKind::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Decide which consumption model a sheet's column set belongs to.
///
/// Rules are tried in order and the first match wins:
/// 1. a fuel-type column makes it a fuel ledger;
/// 2. count, power, unit and annual-hours columns together make it an
///    equipment inventory;
/// 3. anything else is unrecognized.
pub fn classify(columns: &[String], vocab: &ColumnVocabulary) -> SheetModel {
    let brand = find_column(columns, &vocab.brand);
    let model = find_column(columns, &vocab.model);

    if let Some(fuel_type) = find_column(columns, &vocab.fuel_type) {
        return SheetModel::Fuel(FuelColumns {
            fuel_type,
            annual_fuel: find_column(columns, &vocab.annual_fuel),
            brand,
            model,
        });
    }

    let required = (
        find_column(columns, &vocab.count),
        find_column(columns, &vocab.power),
        find_column(columns, &vocab.unit),
        find_column(columns, &vocab.annual_hours),
    );
    if let (Some(count), Some(power), Some(unit), Some(annual_hours)) = required {
        return SheetModel::Equipment(EquipmentColumns {
            count,
            power,
            unit,
            annual_hours,
            brand,
            model,
        });
    }

    SheetModel::Unrecognized
}
