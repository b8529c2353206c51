use crate::calculate::outcome::ConsumptionRow;
use crate::classify::engine::EquipmentColumns;
use crate::classify::resolver::resolve_equipment_unit;
use crate::factors::schema::{EmissionFactorStore, FactorResolution};
use crate::model::{SourceColor, Table, Unit};
use crate::parsing::values::{coerce_number, product_all, sum_present};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Consumption of one inventory row: count × power × annual hours.
///
/// `None` when any of the three fields is not numeric.
pub fn device_quantity(table: &Table, columns: &EquipmentColumns, row: usize) -> Option<Decimal> {
    product_all([
        coerce_number(table.cell(row, columns.count)),
        coerce_number(table.cell(row, columns.power)),
        coerce_number(table.cell(row, columns.annual_hours)),
    ])
}

/// The sheet's declared unit: the first non-empty cell of the unit column.
///
/// Later unit cells are not consulted; a sheet is assumed to use one unit.
pub fn sheet_unit(table: &Table, columns: &EquipmentColumns) -> Option<Unit> {
    (0..table.row_count())
        .find_map(|row| table.cell(row, columns.unit).as_text())
        .and_then(|text| Unit::from_str_loose(&text))
}

/// Cost an equipment inventory sheet as a single result row.
///
/// Energy units are costed with the operator's `color` choice, liter units
/// with the operator's `fuel` choice; other units cost zero.
pub fn calculate_equipment_sheet(
    table: &Table,
    columns: &EquipmentColumns,
    store: &EmissionFactorStore,
    color: SourceColor,
    fuel: &str,
) -> ConsumptionRow {
    let quantity = sum_present((0..table.row_count()).map(|row| device_quantity(table, columns, row)));
    let unit = sheet_unit(table, columns);
    let key = resolve_equipment_unit(unit.as_ref(), color, fuel);
    let resolution = match &key {
        Some(key) => store.lookup(key),
        None => FactorResolution::Defaulted,
    };
    if resolution.is_defaulted() {
        warn!(
            sheet = %table.name,
            unit = %unit.as_ref().map(|u| u.to_string()).unwrap_or_default(),
            "no factor for equipment unit, costing at zero"
        );
    }
    let factor = resolution.factor();
    debug!(sheet = %table.name, %quantity, %factor, "equipment sheet");

    ConsumptionRow {
        sheet: table.name.clone(),
        label: table.name.clone(),
        category: table.name.clone(),
        unit,
        factor_key: key,
        resolution,
        factor,
        quantity,
        footprint: quantity.saturating_mul(factor),
    }
}
