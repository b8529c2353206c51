pub mod equipment;
pub mod fuel;
pub mod outcome;

use crate::classify::engine::{classify, SheetModel};
use crate::classify::vocabulary::{ColumnVocabulary, FuelVocabulary};
use crate::factors::schema::EmissionFactorStore;
use crate::model::{SourceColor, Table, Workbook};
use outcome::{FootprintReport, SheetResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Operator choices and vocabularies for a calculation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationOptions {
    pub columns: ColumnVocabulary,
    pub fuels: FuelVocabulary,
    /// Color for energy-unit equipment sheets without an explicit choice.
    pub default_color: SourceColor,
    pub sheet_colors: BTreeMap<String, SourceColor>,
    /// Fuel for liter-unit equipment sheets without an explicit choice.
    pub default_fuel: String,
    pub sheet_fuels: BTreeMap<String, String>,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        CalculationOptions {
            columns: ColumnVocabulary::default(),
            fuels: FuelVocabulary::default(),
            default_color: SourceColor::Green,
            sheet_colors: BTreeMap::new(),
            default_fuel: "gasoline".into(),
            sheet_fuels: BTreeMap::new(),
        }
    }
}

impl CalculationOptions {
    pub fn color_for(&self, sheet: &str) -> SourceColor {
        self.sheet_colors
            .get(sheet)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Fuel key for a liter-unit sheet, with fuel aliases applied.
    pub fn fuel_for(&self, sheet: &str) -> &str {
        let fuel = self
            .sheet_fuels
            .get(sheet)
            .map(|s| s.as_str())
            .unwrap_or(&self.default_fuel);
        self.fuels.canonical_fuel(fuel)
    }
}

/// Classify and cost a single sheet.
pub fn calculate_sheet(
    table: &Table,
    store: &EmissionFactorStore,
    options: &CalculationOptions,
) -> SheetResult {
    let model = classify(&table.columns, &options.columns);
    debug!(sheet = %table.name, model = %model.kind(), "sheet classified");
    let rows = match &model {
        SheetModel::Fuel(columns) => {
            fuel::calculate_fuel_sheet(table, columns, store, &options.fuels)
        }
        SheetModel::Equipment(columns) => vec![equipment::calculate_equipment_sheet(
            table,
            columns,
            store,
            options.color_for(&table.name),
            options.fuel_for(&table.name),
        )],
        SheetModel::Unrecognized => {
            warn!(sheet = %table.name, columns = ?table.columns, "sheet has no recognizable structure");
            Vec::new()
        }
    };

    SheetResult {
        sheet: table.name.clone(),
        model: model.kind(),
        columns: table.columns.clone(),
        rows,
    }
}

/// Classify and cost every sheet of a workbook, in workbook order.
///
/// Unrecognized sheets are kept in the report with no rows and do not
/// contribute to the total.
pub fn calculate_workbook(
    workbook: &Workbook,
    store: &EmissionFactorStore,
    options: &CalculationOptions,
) -> FootprintReport {
    let sheets: Vec<SheetResult> = workbook
        .sheets
        .iter()
        .map(|table| calculate_sheet(table, store, options))
        .collect();
    let report = FootprintReport::from_sheets(sheets);
    info!(
        sheets = report.sheets.len(),
        rows = report.rows().count(),
        total = %report.total_footprint,
        "footprint calculated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::engine::ModelKind;
    use crate::factors::schema::FactorKey;
    use crate::model::{CellValue, EnergyUnit};
    use rust_decimal_macros::dec;

    fn fuel_sheet() -> Table {
        let mut t = Table::new("Vervoer", &["Brandstof", "Brandstof p/j"]);
        t.push_row(vec!["diesel".into(), 10.into()]);
        t.push_row(vec!["diesel".into(), 5.into()]);
        t.push_row(vec!["gasoline".into(), 3.into()]);
        t
    }

    fn equipment_sheet(name: &str) -> Table {
        let mut t = Table::new(name, &["Aantal", "Vermogen", "Eenheid", "Draaiuren p/j"]);
        t.push_row(vec![2.into(), 100.into(), "kWh".into(), 10.into()]);
        t.push_row(vec![3.into(), 50.into(), "kWh".into(), 20.into()]);
        t
    }

    fn store() -> EmissionFactorStore {
        let mut store = EmissionFactorStore::new();
        store.set_factor(FactorKey::fuel("diesel"), dec!(2.0)).unwrap();
        store.set_factor(FactorKey::fuel("gasoline"), dec!(1.5)).unwrap();
        store
            .set_factor(FactorKey::energy(EnergyUnit::Kwh, SourceColor::Grey), dec!(0.4))
            .unwrap();
        store
    }

    #[test]
    fn workbook_total_spans_sheets() {
        let mut notes = Table::new("Notities", &["Opmerking"]);
        notes.push_row(vec![CellValue::from("n.v.t.")]);
        let workbook = Workbook {
            sheets: vec![fuel_sheet(), equipment_sheet("Kantoor"), notes],
        };
        let mut options = CalculationOptions::default();
        options.sheet_colors.insert("Kantoor".into(), SourceColor::Grey);

        let report = calculate_workbook(&workbook, &store(), &options);
        assert_eq!(report.sheets.len(), 3);
        assert_eq!(report.sheets[2].model, ModelKind::Unrecognized);
        assert!(report.sheets[2].rows.is_empty());
        assert_eq!(report.unrecognized().count(), 1);
        // 30 + 4.5 + 2000
        assert_eq!(report.total_footprint, dec!(2034.5));
    }

    #[test]
    fn total_is_independent_of_sheet_order() {
        let mut options = CalculationOptions::default();
        options.default_color = SourceColor::Grey;
        let forward = Workbook {
            sheets: vec![fuel_sheet(), equipment_sheet("A"), equipment_sheet("B")],
        };
        let reversed = Workbook {
            sheets: vec![equipment_sheet("B"), equipment_sheet("A"), fuel_sheet()],
        };
        let a = calculate_workbook(&forward, &store(), &options);
        let b = calculate_workbook(&reversed, &store(), &options);
        assert_eq!(a.total_footprint, b.total_footprint);
    }

    #[test]
    fn default_color_is_green() {
        let options = CalculationOptions::default();
        let result = calculate_sheet(&equipment_sheet("Kantoor"), &store(), &options);
        assert_eq!(result.rows[0].factor, dec!(0));
        assert_eq!(options.fuel_for("Kantoor"), "gasoline");
    }

    #[test]
    fn sheet_fuel_choice_uses_aliases() {
        let mut options = CalculationOptions::default();
        options.sheet_fuels.insert("Aggregaten".into(), "benzine".into());
        options.sheet_fuels.insert("Heftrucks".into(), "diesel".into());
        assert_eq!(options.fuel_for("Aggregaten"), "gasoline");
        assert_eq!(options.fuel_for("Heftrucks"), "diesel");
    }
}
