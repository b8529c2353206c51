use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use tracing::debug;

use crate::error::FootprintError;
use crate::factors::FactorSheetLayout;
use crate::model::{CellValue, Table, Workbook};
use crate::parsing::values::f64_to_decimal;
use rust_decimal::Decimal;

fn open(bytes: &[u8]) -> Result<Xlsx<Cursor<&[u8]>>, FootprintError> {
    calamine::open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| FootprintError::WorkbookRead(format!("failed to open xlsx: {e}")))
}

/// Read every sheet of an xlsx workbook, in workbook order.
///
/// The first used row of each sheet is its header row; everything below is
/// data. Sheets with no used cells become tables without columns.
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook, FootprintError> {
    let mut xlsx = open(bytes)?;
    let names = xlsx.sheet_names();
    if names.is_empty() {
        return Err(FootprintError::EmptyWorkbook);
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = xlsx
            .worksheet_range(&name)
            .map_err(|e| FootprintError::WorkbookRead(format!("sheet '{name}': {e}")))?;
        let table = range_to_table(&name, &range, 0);
        debug!(sheet = %name, columns = table.columns.len(), rows = table.row_count(), "sheet read");
        sheets.push(table);
    }
    Ok(Workbook { sheets })
}

/// Read the first sheet of a factor configuration workbook, with the header
/// on the sheet row given by `layout.header_row`.
pub fn read_factor_table(
    bytes: &[u8],
    layout: &FactorSheetLayout,
) -> Result<Table, FootprintError> {
    let mut xlsx = open(bytes)?;
    let name = xlsx
        .sheet_names()
        .into_iter()
        .next()
        .ok_or(FootprintError::EmptyWorkbook)?;
    let range = xlsx
        .worksheet_range(&name)
        .map_err(|e| FootprintError::WorkbookRead(format!("sheet '{name}': {e}")))?;

    // calamine ranges start at the first used row, not at sheet row 0
    let first_row = range.start().map(|(row, _)| row).unwrap_or(0);
    let skip = layout.header_row.saturating_sub(first_row) as usize;
    Ok(range_to_table(&name, &range, skip))
}

/// Build a table whose header is the `header_offset`-th row of `range`.
fn range_to_table(name: &str, range: &Range<Data>, header_offset: usize) -> Table {
    let mut rows = range.rows().skip(header_offset);
    let columns = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| convert_cell(cell).as_text().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    Table {
        name: name.to_string(),
        columns,
        rows: rows
            .map(|row| row.iter().map(convert_cell).collect())
            .collect(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(Decimal::from(*i)),
        Data::Float(f) => f64_to_decimal(*f).map_or(CellValue::Empty, CellValue::Number),
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Text(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
