use crate::calculate::outcome::ConsumptionRow;
use crate::classify::engine::FuelColumns;
use crate::classify::resolver::{resolve_fuel_category, FuelMatch};
use crate::classify::vocabulary::FuelVocabulary;
use crate::factors::schema::EmissionFactorStore;
use crate::model::Table;
use crate::parsing::values::coerce_number;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Cost a fuel-ledger sheet: one row per distinct fuel label.
///
/// Rows with an empty fuel label are ignored. Groups keep the order in which
/// their label first appears; a label's quantity is the sum of its numeric
/// annual-fuel cells, non-numeric cells contributing nothing.
pub fn calculate_fuel_sheet(
    table: &Table,
    columns: &FuelColumns,
    store: &EmissionFactorStore,
    vocab: &FuelVocabulary,
) -> Vec<ConsumptionRow> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();

    for row in 0..table.row_count() {
        let Some(label) = table.cell(row, columns.fuel_type).as_text() else {
            continue;
        };
        let quantity = columns
            .annual_fuel
            .and_then(|col| coerce_number(table.cell(row, col)))
            .unwrap_or(Decimal::ZERO);

        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, total)) => *total = total.saturating_add(quantity),
            None => groups.push((label, quantity)),
        }
    }

    groups
        .into_iter()
        .map(|(label, quantity)| {
            let category = resolve_fuel_category(&label, vocab);
            let key = category.factor_key();
            let resolution = store.lookup(&key);
            if resolution.is_defaulted() {
                warn!(sheet = %table.name, %label, %key, "no factor configured, costing at zero");
            }
            let factor = resolution.factor();
            let display = match category.matched_by {
                FuelMatch::Electric => "Transport-E".to_string(),
                FuelMatch::Hybrid => "Transport-Hybrid".to_string(),
                FuelMatch::FirstToken => format!("Transport-{label}"),
            };
            debug!(sheet = %table.name, %label, category = %category.category, %quantity, "fuel group");

            ConsumptionRow {
                sheet: table.name.clone(),
                label: display,
                category: category.category,
                unit: Some(category.unit),
                factor_key: Some(key),
                resolution,
                factor,
                quantity,
                footprint: quantity.saturating_mul(factor),
            }
        })
        .collect()
}
