pub mod aggregate;
pub mod calculate;
pub mod classify;
pub mod error;
pub mod export;
pub mod extraction;
pub mod factors;
pub mod model;
pub mod parsing;
pub mod session;

use aggregate::intensity::{analyze_intensity, IntensityAnalysis};
use calculate::outcome::FootprintReport;
use calculate::{calculate_workbook, CalculationOptions};
use classify::vocabulary::TrendVocabulary;
use error::FootprintError;
use factors::schema::EmissionFactorStore;
use factors::{FactorSheetLayout, LoadReport};

pub use session::Session;

/// Main API entry point: read an xlsx upload and cost every sheet.
///
/// Sheets whose columns match neither consumption model are kept in the
/// report as unrecognized and contribute nothing to the total.
pub fn calculate_xlsx(
    bytes: &[u8],
    store: &EmissionFactorStore,
    options: &CalculationOptions,
) -> Result<FootprintReport, FootprintError> {
    let workbook = extraction::read_workbook(bytes)?;
    Ok(calculate_workbook(&workbook, store, options))
}

/// Run the intensity trend analysis on the first sheet of an xlsx upload.
pub fn analyze_intensity_xlsx(
    bytes: &[u8],
    vocab: &TrendVocabulary,
) -> Result<IntensityAnalysis, FootprintError> {
    let workbook = extraction::read_workbook(bytes)?;
    let table = workbook
        .sheets
        .first()
        .ok_or(FootprintError::EmptyWorkbook)?;
    analyze_intensity(table, vocab)
}

/// Merge a factor configuration workbook into `store`.
pub fn load_factor_sheet(
    bytes: &[u8],
    store: &mut EmissionFactorStore,
    layout: &FactorSheetLayout,
) -> Result<LoadReport, FootprintError> {
    let table = extraction::read_factor_table(bytes, layout)?;
    store.load(&table, layout)
}
