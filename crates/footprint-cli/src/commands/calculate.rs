use clap::Args;
use footprint_core::aggregate::summary::summarize_workbook;
use footprint_core::calculate::{calculate_workbook, CalculationOptions};
use footprint_core::error::FootprintError;
use footprint_core::export::write_results_to;
use footprint_core::extraction::read_workbook;
use footprint_core::factors::schema::EmissionFactorStore;
use footprint_core::factors::{self, FactorSheetLayout};
use footprint_core::load_factor_sheet;
use footprint_core::model::SourceColor;
use footprint_core::parsing::normalize::normalize_label;
use std::path::PathBuf;
use tracing::info;

use super::{parse_assignment, parse_color_assignment};
use crate::output;

#[derive(Args)]
pub struct CalculateArgs {
    /// Workbook (xlsx) with one sheet per vehicle fleet or equipment group
    pub workbook: PathBuf,

    /// Factor configuration file (JSON)
    #[arg(short, long = "factors", value_name = "FILE")]
    pub factors: Option<PathBuf>,

    /// Factor workbook (headers on row 5) merged over the configuration
    #[arg(long = "factor-sheet", value_name = "XLSX")]
    pub factor_sheet: Option<PathBuf>,

    /// Energy source color for an equipment sheet (default: green)
    #[arg(long = "color", value_name = "SHEET=COLOR", value_parser = parse_color_assignment)]
    pub colors: Vec<(String, SourceColor)>,

    /// Fuel for an equipment sheet measured in liters (default: gasoline)
    #[arg(long = "fuel", value_name = "SHEET=FUEL", value_parser = parse_assignment)]
    pub fuels: Vec<(String, String)>,

    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table")]
    pub output: String,

    /// Write the result table to an xlsx file
    #[arg(short = 'O', long = "export", value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Also show per-sheet totals, top-5 tables and sheet shares
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: CalculateArgs) -> Result<(), FootprintError> {
    let mut store = match &args.factors {
        Some(path) => factors::load_store(path)?,
        None => EmissionFactorStore::new(),
    };
    if let Some(path) = &args.factor_sheet {
        let bytes = std::fs::read(path)?;
        let loaded = load_factor_sheet(&bytes, &mut store, &FactorSheetLayout::default())?;
        info!(applied = loaded.applied.len(), skipped = loaded.skipped.len(), "factor sheet merged");
    }

    let mut options = CalculationOptions::default();
    options.sheet_colors.extend(args.colors);
    options.sheet_fuels.extend(
        args.fuels
            .into_iter()
            .map(|(sheet, fuel)| (sheet, normalize_label(&fuel))),
    );

    let bytes = std::fs::read(&args.workbook)?;
    let workbook = read_workbook(&bytes)?;
    let report = calculate_workbook(&workbook, &store, &options);
    let summary = args
        .summary
        .then(|| summarize_workbook(&workbook, &report, &options));

    match args.output.as_str() {
        "json" => output::json::print_report(&report, summary.as_ref())?,
        _ => output::table::print_report(&report, summary.as_ref()),
    }

    if let Some(path) = &args.export {
        write_results_to(&report, path)?;
        eprintln!("Results written to {}", path.display());
    }

    Ok(())
}
