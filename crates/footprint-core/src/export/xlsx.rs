use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::aggregate::intensity::IntensityAnalysis;
use crate::calculate::outcome::FootprintReport;
use crate::error::FootprintError;

pub const RESULTS_SHEET: &str = "Results";
pub const INTENSITY_SHEET: &str = "CO2 intensity";

const RESULT_HEADERS: [&str; 5] = ["Component", "Unit", "Emission factor", "Consumption", "Footprint"];
const INTENSITY_HEADERS: [&str; 4] = ["Year", "Revenue", "CO₂ footprint", "CO₂ intensity"];

fn write_err(e: rust_xlsxwriter::XlsxError) -> FootprintError {
    FootprintError::WorkbookWrite(e.to_string())
}

fn write_headers(ws: &mut Worksheet, headers: &[&str]) -> Result<(), FootprintError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *header, &bold)
            .map_err(write_err)?;
        ws.set_column_width(col as u16, 18).map_err(write_err)?;
    }
    Ok(())
}

fn write_decimal(ws: &mut Worksheet, row: u32, col: u16, value: Decimal) -> Result<(), FootprintError> {
    ws.write_number(row, col, value.to_f64().unwrap_or_default())
        .map_err(write_err)?;
    Ok(())
}

fn results_workbook(report: &FootprintReport) -> Result<Workbook, FootprintError> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(RESULTS_SHEET).map_err(write_err)?;
    write_headers(ws, &RESULT_HEADERS)?;

    for (i, row) in report.rows().enumerate() {
        let r = (i + 1) as u32;
        ws.write_string(r, 0, &row.label).map_err(write_err)?;
        let unit = row.unit.as_ref().map(|u| u.to_string()).unwrap_or_default();
        ws.write_string(r, 1, unit).map_err(write_err)?;
        write_decimal(ws, r, 2, row.factor)?;
        write_decimal(ws, r, 3, row.quantity)?;
        write_decimal(ws, r, 4, row.footprint)?;
    }
    Ok(workbook)
}

fn intensity_workbook(analysis: &IntensityAnalysis) -> Result<Workbook, FootprintError> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(INTENSITY_SHEET).map_err(write_err)?;
    write_headers(ws, &INTENSITY_HEADERS)?;

    for (i, point) in analysis.series.points.iter().enumerate() {
        let r = (i + 1) as u32;
        ws.write_number(r, 0, point.year).map_err(write_err)?;
        write_decimal(ws, r, 1, point.revenue)?;
        write_decimal(ws, r, 2, point.footprint)?;
        write_decimal(ws, r, 3, point.intensity.round_dp(3))?;
    }
    Ok(workbook)
}

/// Result table as xlsx bytes: one row per consumption row, in report order.
pub fn write_results(report: &FootprintReport) -> Result<Vec<u8>, FootprintError> {
    results_workbook(report)?.save_to_buffer().map_err(write_err)
}

pub fn write_results_to(report: &FootprintReport, path: &Path) -> Result<(), FootprintError> {
    results_workbook(report)?.save(path).map_err(write_err)?;
    info!(path = %path.display(), rows = report.rows().count(), "results exported");
    Ok(())
}

/// Intensity series as xlsx bytes, intensity rounded to three decimals.
pub fn write_intensity(analysis: &IntensityAnalysis) -> Result<Vec<u8>, FootprintError> {
    intensity_workbook(analysis)?.save_to_buffer().map_err(write_err)
}

pub fn write_intensity_to(analysis: &IntensityAnalysis, path: &Path) -> Result<(), FootprintError> {
    intensity_workbook(analysis)?.save(path).map_err(write_err)?;
    info!(path = %path.display(), points = analysis.series.len(), "intensity analysis exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::intensity::analyze_intensity;
    use crate::calculate::{calculate_workbook, CalculationOptions};
    use crate::extraction::read_workbook;
    use crate::factors::schema::{EmissionFactorStore, FactorKey};
    use crate::model::{CellValue, Table, Workbook as Sheets};
    use rust_decimal_macros::dec;

    fn report() -> FootprintReport {
        let mut ledger = Table::new("Vervoer", &["Brandstof", "Brandstof p/j"]);
        ledger.push_row(vec!["diesel".into(), 10.into()]);
        ledger.push_row(vec!["gasoline".into(), 3.into()]);
        let mut store = EmissionFactorStore::new();
        store.set_factor(FactorKey::fuel("diesel"), dec!(2)).unwrap();
        store.set_factor(FactorKey::fuel("gasoline"), dec!(1.5)).unwrap();
        calculate_workbook(
            &Sheets { sheets: vec![ledger] },
            &store,
            &CalculationOptions::default(),
        )
    }

    #[test]
    fn results_round_trip_through_reader() {
        let bytes = write_results(&report()).unwrap();
        let workbook = read_workbook(&bytes).unwrap();
        let sheet = workbook.sheet(RESULTS_SHEET).unwrap();
        assert_eq!(sheet.columns, RESULT_HEADERS.to_vec());
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(0, 0), &CellValue::Text("Transport-diesel".into()));
        assert_eq!(sheet.cell(0, 1), &CellValue::Text("L".into()));
        assert_eq!(sheet.cell(1, 4), &CellValue::Number(dec!(4.5)));
    }

    #[test]
    fn intensity_is_rounded() {
        let mut table = Table::new("Trend", &["Jaar", "Omzet", "CO2"]);
        table.push_row(vec![2020.into(), 3.into(), 1.into()]);
        table.push_row(vec![2021.into(), 3.into(), 2.into()]);
        let analysis = analyze_intensity(&table, &Default::default()).unwrap();

        let bytes = write_intensity(&analysis).unwrap();
        let workbook = read_workbook(&bytes).unwrap();
        let sheet = workbook.sheet(INTENSITY_SHEET).unwrap();
        assert_eq!(sheet.cell(0, 0), &CellValue::Number(dec!(2020)));
        assert_eq!(sheet.cell(0, 3), &CellValue::Number(dec!(0.333)));
        assert_eq!(sheet.cell(1, 3), &CellValue::Number(dec!(0.667)));
    }

    #[test]
    fn export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        write_results_to(&report(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(read_workbook(&bytes).unwrap().sheet(RESULTS_SHEET).is_some());
    }
}
