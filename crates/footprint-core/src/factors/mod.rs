pub mod builtin;
pub mod schema;

use crate::error::FootprintError;
use crate::model::Table;
use crate::parsing::normalize::normalize_label;
use crate::parsing::values::coerce_number;
use rust_decimal::Decimal;
use schema::{EmissionFactorStore, FactorKey};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Where the factor columns live in a factor configuration sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorSheetLayout {
    /// Zero-based sheet row holding the column headers.
    pub header_row: u32,
    /// Accepted headers for the descriptive label column.
    pub label_columns: Vec<String>,
    /// Accepted headers for the factor column.
    pub factor_columns: Vec<String>,
}

impl Default for FactorSheetLayout {
    fn default() -> Self {
        FactorSheetLayout {
            header_row: 4,
            label_columns: vec!["Gasvormige brandstoffen".into(), "Label".into()],
            factor_columns: vec![
                "Kg CO₂-eq / eenheid".into(),
                "Kg CO2-eq / eenheid".into(),
                "kg CO₂-eq / unit".into(),
                "Factor".into(),
            ],
        }
    }
}

/// What a bulk load changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Canonical labels found, with the factor written for each.
    pub applied: Vec<AppliedFactor>,
    /// Canonical labels found whose factor cell was not a usable number.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFactor {
    pub label: String,
    pub key: FactorKey,
    pub value: Decimal,
}

impl EmissionFactorStore {
    /// Merge factors from a configuration table into the store.
    ///
    /// Each label is trimmed and lowercased and matched exactly against
    /// [`builtin::CANONICAL_LABELS`]. Matched factors overwrite the current
    /// value; canonical labels missing from the table leave the store as is.
    /// A missing canonical row is not an error.
    pub fn load(
        &mut self,
        table: &Table,
        layout: &FactorSheetLayout,
    ) -> Result<LoadReport, FootprintError> {
        let label_col =
            table
                .find_column(&layout.label_columns)
                .ok_or_else(|| FootprintError::MissingColumn {
                    sheet: table.name.clone(),
                    expected: layout.label_columns.join(" / "),
                })?;
        let factor_col =
            table
                .find_column(&layout.factor_columns)
                .ok_or_else(|| FootprintError::MissingColumn {
                    sheet: table.name.clone(),
                    expected: layout.factor_columns.join(" / "),
                })?;

        let normalized: Vec<Option<String>> = (0..table.row_count())
            .map(|row| table.cell(row, label_col).as_text().map(|t| normalize_label(&t)))
            .collect();

        let mut report = LoadReport::default();
        for (label, target) in builtin::CANONICAL_LABELS {
            let Some(row) = normalized.iter().position(|n| n.as_deref() == Some(*label)) else {
                continue;
            };
            let key = target.key();
            match coerce_number(table.cell(row, factor_col)) {
                Some(value) if !value.is_sign_negative() || value.is_zero() => {
                    debug!(label, %key, %value, "factor loaded");
                    self.set_factor(key.clone(), value)?;
                    report.applied.push(AppliedFactor {
                        label: label.to_string(),
                        key,
                        value,
                    });
                }
                _ => {
                    warn!(label, "factor cell is not a non-negative number, keeping current value");
                    report.skipped.push(label.to_string());
                }
            }
        }

        info!(
            sheet = %table.name,
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "emission factors merged"
        );
        Ok(report)
    }
}

/// Load a factor store from a JSON file.
pub fn load_store(path: &Path) -> Result<EmissionFactorStore, FootprintError> {
    let content = std::fs::read_to_string(path).map_err(|e| FootprintError::FactorLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_store(&content, path)
}

/// Parse a factor store from a JSON string.
pub fn parse_store(json: &str, source: &Path) -> Result<EmissionFactorStore, FootprintError> {
    let store: EmissionFactorStore =
        serde_json::from_str(json).map_err(|e| FootprintError::FactorLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_store(&store)?;
    Ok(store)
}

/// Parse a factor store from a JSON string (no file path context).
pub fn parse_store_str(json: &str) -> Result<EmissionFactorStore, FootprintError> {
    let store: EmissionFactorStore = serde_json::from_str(json).map_err(FootprintError::Json)?;
    validate_store(&store)?;
    Ok(store)
}

/// Validate that every configured factor is non-negative and every fuel key
/// is a normalized, non-empty name.
pub fn validate_store(store: &EmissionFactorStore) -> Result<(), FootprintError> {
    for (key, value) in store.entries() {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(FootprintError::FactorInvalid(format!(
                "factor for {key} must not be negative (got {value})"
            )));
        }
        if let FactorKey::Fuel { fuel } = &key {
            if fuel.is_empty() {
                return Err(FootprintError::FactorInvalid(
                    "fuel name must not be empty".into(),
                ));
            }
            if *fuel != normalize_label(fuel) {
                return Err(FootprintError::FactorInvalid(format!(
                    "fuel name '{fuel}' must be trimmed lowercase"
                )));
            }
        }
    }
    Ok(())
}
