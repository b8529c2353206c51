use footprint_core::error::FootprintError;
use footprint_core::factors::schema::EmissionFactorStore;
use footprint_core::factors::{self, builtin, FactorSheetLayout};
use footprint_core::load_factor_sheet;
use std::path::{Path, PathBuf};

use crate::output;

pub fn template() -> Result<(), FootprintError> {
    print!("{}", builtin::template_json());
    Ok(())
}

pub fn import(sheet: &Path, base: Option<PathBuf>) -> Result<(), FootprintError> {
    let mut store = match base {
        Some(path) => factors::load_store(&path)?,
        None => EmissionFactorStore::new(),
    };
    let bytes = std::fs::read(sheet)?;
    let loaded = load_factor_sheet(&bytes, &mut store, &FactorSheetLayout::default())?;

    for applied in &loaded.applied {
        eprintln!("  {:<24} -> {} = {}", applied.label, applied.key, applied.value);
    }
    for label in &loaded.skipped {
        eprintln!("  {label:<24} -> skipped (not a non-negative number)");
    }
    if loaded.applied.is_empty() {
        eprintln!("Warning: no recognized factor labels found; see `footprint factors labels`");
    }

    output::json::print(&store)
}

pub fn validate(file: &Path) -> Result<(), FootprintError> {
    let store = factors::load_store(file)?;
    let entries = store.entries();
    let configured = entries.iter().filter(|(_, v)| !v.is_zero()).count();
    println!(
        "OK: {} factors ({} non-zero)",
        entries.len(),
        configured
    );
    Ok(())
}

pub fn labels() -> Result<(), FootprintError> {
    println!("Recognized labels in the factor workbook column:\n");
    for (label, target) in builtin::CANONICAL_LABELS {
        println!("  {:<24} {}", label, target.key());
    }
    Ok(())
}
