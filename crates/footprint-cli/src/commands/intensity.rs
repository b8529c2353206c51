use footprint_core::analyze_intensity_xlsx;
use footprint_core::classify::vocabulary::TrendVocabulary;
use footprint_core::error::FootprintError;
use footprint_core::export::write_intensity_to;
use std::path::PathBuf;

use crate::output;

pub fn run(
    workbook: PathBuf,
    output_format: &str,
    export: Option<PathBuf>,
) -> Result<(), FootprintError> {
    let bytes = std::fs::read(&workbook)?;
    let analysis = analyze_intensity_xlsx(&bytes, &TrendVocabulary::default())?;

    match output_format {
        "json" => output::json::print(&analysis)?,
        _ => output::table::print_intensity(&analysis),
    }

    if let Some(path) = export {
        write_intensity_to(&analysis, &path)?;
        eprintln!("Intensity analysis written to {}", path.display());
    }

    Ok(())
}
