use crate::aggregate::{top_n, top_n_by, RankField, Ranked};
use crate::calculate::equipment::device_quantity;
use crate::calculate::outcome::{FootprintReport, SheetResult};
use crate::calculate::CalculationOptions;
use crate::classify::engine::{classify, ModelKind, SheetModel};
use crate::model::{Table, Workbook};
use crate::parsing::values::coerce_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Length of every top-N table in a summary.
pub const TOP_ENTRIES: usize = 5;

const UNKNOWN: &str = "Unknown";
const TRANSPORT_MARKERS: &[&str] = &["vervoer", "transport"];

/// How a sheet is grouped for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayGroup {
    Transport,
    Equipment,
}

/// Display grouping by sheet name: transport-like names group as transport.
pub fn display_group(sheet: &str) -> DisplayGroup {
    let lower = sheet.to_lowercase();
    if TRANSPORT_MARKERS.iter().any(|m| lower.contains(m)) {
        DisplayGroup::Transport
    } else {
        DisplayGroup::Equipment
    }
}

/// A single vehicle or device in a top-N table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<String>,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub model: ModelKind,
    pub group: DisplayGroup,
    pub total_quantity: Decimal,
    pub total_footprint: Decimal,
    /// Highest-consuming vehicles or devices on the sheet.
    pub top_entries: Vec<UsageEntry>,
}

impl Ranked for SheetSummary {
    fn quantity(&self) -> Decimal {
        self.total_quantity
    }

    fn footprint(&self) -> Decimal {
        self.total_footprint
    }
}

/// One sheet's value and its percentage of the workbook total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetShare {
    pub sheet: String,
    pub value: Decimal,
    /// `None` when the workbook total is zero.
    pub share_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookSummary {
    pub sheets: Vec<SheetSummary>,
    /// Sheets left out because their structure was not recognized.
    pub unrecognized: Vec<String>,
    pub top_by_quantity: Vec<SheetShare>,
    pub top_by_footprint: Vec<SheetShare>,
    pub quantity_shares: Vec<SheetShare>,
    pub footprint_shares: Vec<SheetShare>,
}

/// Summarize one calculated sheet. Unrecognized sheets have no summary.
pub fn summarize_sheet(
    table: &Table,
    result: &SheetResult,
    options: &CalculationOptions,
) -> Option<SheetSummary> {
    let entries = match classify(&table.columns, &options.columns) {
        SheetModel::Fuel(cols) => {
            let Some(qty_col) = cols.annual_fuel else {
                return Some(build_summary(table, result, Vec::new()));
            };
            (0..table.row_count())
                .filter_map(|row| {
                    let quantity = coerce_number(table.cell(row, qty_col))?;
                    Some(UsageEntry {
                        brand: text_or_unknown(table, row, cols.brand),
                        model: text_or_unknown(table, row, cols.model),
                        fuel: table.cell(row, cols.fuel_type).as_text(),
                        quantity,
                    })
                })
                .collect()
        }
        SheetModel::Equipment(cols) => (0..table.row_count())
            .filter_map(|row| {
                let quantity = device_quantity(table, &cols, row)?;
                Some(UsageEntry {
                    brand: text_or_unknown(table, row, cols.brand),
                    model: text_or_unknown(table, row, cols.model),
                    fuel: None,
                    quantity,
                })
            })
            .collect(),
        SheetModel::Unrecognized => return None,
    };

    Some(build_summary(table, result, entries))
}

fn build_summary(table: &Table, result: &SheetResult, entries: Vec<UsageEntry>) -> SheetSummary {
    SheetSummary {
        sheet: table.name.clone(),
        model: result.model,
        group: display_group(&table.name),
        total_quantity: result.total_quantity(),
        total_footprint: result.total_footprint(),
        top_entries: top_n_by(&entries, TOP_ENTRIES, |e| e.quantity),
    }
}

fn text_or_unknown(table: &Table, row: usize, col: Option<usize>) -> String {
    col.and_then(|c| table.cell(row, c).as_text())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Per-sheet summaries, sheet rankings and share-of-total data for a report.
pub fn summarize_workbook(
    workbook: &Workbook,
    report: &FootprintReport,
    options: &CalculationOptions,
) -> WorkbookSummary {
    let mut sheets = Vec::new();
    let mut unrecognized = Vec::new();
    for result in &report.sheets {
        let summary = workbook
            .sheet(&result.sheet)
            .and_then(|table| summarize_sheet(table, result, options));
        match summary {
            Some(s) => sheets.push(s),
            None => unrecognized.push(result.sheet.clone()),
        }
    }

    let quantity_shares = shares(&sheets, RankField::Quantity);
    let footprint_shares = shares(&sheets, RankField::Footprint);
    let top_by_quantity = top_shares(&sheets, RankField::Quantity, &quantity_shares);
    let top_by_footprint = top_shares(&sheets, RankField::Footprint, &footprint_shares);

    WorkbookSummary {
        sheets,
        unrecognized,
        top_by_quantity,
        top_by_footprint,
        quantity_shares,
        footprint_shares,
    }
}

fn shares(sheets: &[SheetSummary], field: RankField) -> Vec<SheetShare> {
    let total = sheets
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.rank_value(field)));
    sheets
        .iter()
        .map(|s| {
            let value = s.rank_value(field);
            SheetShare {
                sheet: s.sheet.clone(),
                value,
                share_pct: value
                    .saturating_mul(Decimal::ONE_HUNDRED)
                    .checked_div(total),
            }
        })
        .collect()
}

/// Top sheets by `field`; percentages stay relative to the whole workbook.
fn top_shares(sheets: &[SheetSummary], field: RankField, all: &[SheetShare]) -> Vec<SheetShare> {
    top_n(sheets, TOP_ENTRIES, field)
        .iter()
        .filter_map(|top| all.iter().find(|s| s.sheet == top.sheet).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::calculate_workbook;
    use crate::factors::schema::{EmissionFactorStore, FactorKey};
    use crate::model::{CellValue, EnergyUnit, SourceColor};
    use rust_decimal_macros::dec;

    fn workbook() -> Workbook {
        let mut vervoer = Table::new("Vervoer", &["Merk", "Type", "Brandstof", "Brandstof p/j"]);
        for (brand, model, fuel, qty) in [
            ("Volvo", "FH", "Diesel", CellValue::from(900)),
            ("Ford", "Transit", "Diesel", CellValue::from(400)),
            ("Toyota", "Yaris", "Hybride", CellValue::from(300)),
            ("Fiat", "Ducato", "Diesel", CellValue::from("onbekend")),
        ] {
            vervoer.push_row(vec![brand.into(), model.into(), fuel.into(), qty]);
        }

        let mut werkplaats = Table::new(
            "Werkplaats",
            &["Merk", "Aantal", "Vermogen", "Eenheid", "Draaiuren p/j"],
        );
        werkplaats.push_row(vec!["Makita".into(), 2.into(), 1.into(), "kWh".into(), 100.into()]);
        werkplaats.push_row(vec![CellValue::Empty, 1.into(), 5.into(), "kWh".into(), 100.into()]);
        werkplaats.push_row(vec!["Bosch".into(), 1.into(), "?".into(), "kWh".into(), 100.into()]);

        let mut notes = Table::new("Notities", &["Tekst"]);
        notes.push_row(vec!["-".into()]);

        Workbook {
            sheets: vec![vervoer, werkplaats, notes],
        }
    }

    fn store() -> EmissionFactorStore {
        let mut store = EmissionFactorStore::new();
        store.set_factor(FactorKey::fuel("diesel"), dec!(3)).unwrap();
        store.set_factor(FactorKey::fuel("gasoline"), dec!(2)).unwrap();
        store
            .set_factor(FactorKey::energy(EnergyUnit::Kwh, SourceColor::Green), dec!(0.5))
            .unwrap();
        store
    }

    #[test]
    fn display_group_by_name() {
        assert_eq!(display_group("Vervoer 2024"), DisplayGroup::Transport);
        assert_eq!(display_group("TRANSPORT"), DisplayGroup::Transport);
        assert_eq!(display_group("Kantoor"), DisplayGroup::Equipment);
    }

    #[test]
    fn fuel_sheet_summary_ranks_vehicles() {
        let wb = workbook();
        let options = CalculationOptions::default();
        let report = calculate_workbook(&wb, &store(), &options);
        let summary = summarize_sheet(&wb.sheets[0], &report.sheets[0], &options).unwrap();

        assert_eq!(summary.group, DisplayGroup::Transport);
        assert_eq!(summary.total_quantity, dec!(1600));
        // diesel 1300 × 3 + hybrid 300 × 2
        assert_eq!(summary.total_footprint, dec!(4500));
        // the non-numeric row is dropped from the ranking
        assert_eq!(summary.top_entries.len(), 3);
        assert_eq!(summary.top_entries[0].brand, "Volvo");
        assert_eq!(summary.top_entries[0].fuel.as_deref(), Some("Diesel"));
    }

    #[test]
    fn equipment_summary_uses_device_quantities() {
        let wb = workbook();
        let options = CalculationOptions::default();
        let report = calculate_workbook(&wb, &store(), &options);
        let summary = summarize_sheet(&wb.sheets[1], &report.sheets[1], &options).unwrap();

        assert_eq!(summary.group, DisplayGroup::Equipment);
        assert_eq!(summary.total_quantity, dec!(700));
        assert_eq!(summary.total_footprint, dec!(350));
        assert_eq!(summary.top_entries.len(), 2);
        assert_eq!(summary.top_entries[0].brand, "Unknown");
        assert_eq!(summary.top_entries[0].model, "Unknown");
        assert_eq!(summary.top_entries[0].quantity, dec!(500));
    }

    #[test]
    fn workbook_summary_ranks_sheets_and_shares() {
        let wb = workbook();
        let options = CalculationOptions::default();
        let report = calculate_workbook(&wb, &store(), &options);
        let summary = summarize_workbook(&wb, &report, &options);

        assert_eq!(summary.sheets.len(), 2);
        assert_eq!(summary.unrecognized, vec!["Notities".to_string()]);
        assert_eq!(summary.top_by_footprint[0].sheet, "Vervoer");
        assert_eq!(summary.top_by_footprint[1].sheet, "Werkplaats");

        let pct: Vec<Decimal> = summary
            .quantity_shares
            .iter()
            .filter_map(|s| s.share_pct)
            .collect();
        let sum: Decimal = pct.iter().copied().sum();
        assert!((sum - dec!(100)).abs() < dec!(0.000001));
    }

    #[test]
    fn shares_undefined_for_zero_total() {
        let wb = workbook();
        let options = CalculationOptions::default();
        let report = calculate_workbook(&wb, &EmissionFactorStore::new(), &options);
        let summary = summarize_workbook(&wb, &report, &options);
        assert!(summary.footprint_shares.iter().all(|s| s.share_pct.is_none()));
    }
}
