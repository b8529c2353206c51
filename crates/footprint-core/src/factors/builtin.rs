use crate::error::FootprintError;
use crate::factors::schema::{EmissionFactorStore, FactorKey};
use crate::model::{EnergyUnit, SourceColor};

const FACTORS_TEMPLATE_JSON: &str = include_str!("../../../../presets/factors-template.json");

/// Where a canonical factor-sheet label lands in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    Energy(EnergyUnit, SourceColor),
    Fuel(&'static str),
}

impl LabelTarget {
    pub fn key(&self) -> FactorKey {
        match *self {
            LabelTarget::Energy(unit, color) => FactorKey::energy(unit, color),
            LabelTarget::Fuel(fuel) => FactorKey::fuel(fuel),
        }
    }
}

/// Fixed vocabulary of factor-sheet labels, already normalized.
///
/// Labels are applied in this order, so when a sheet carries both the Dutch
/// and the English label for the same factor the English row wins.
pub const CANONICAL_LABELS: &[(&str, LabelTarget)] = &[
    (
        "windkracht",
        LabelTarget::Energy(EnergyUnit::Kwh, SourceColor::Green),
    ),
    (
        "grijze stroom",
        LabelTarget::Energy(EnergyUnit::Kwh, SourceColor::Grey),
    ),
    (
        "groengas (gemiddeld)",
        LabelTarget::Energy(EnergyUnit::CubicMeter, SourceColor::Green),
    ),
    (
        "aardgas (g-gas)",
        LabelTarget::Energy(EnergyUnit::CubicMeter, SourceColor::Grey),
    ),
    ("benzine (fossiel) e0", LabelTarget::Fuel("gasoline")),
    ("diesel (fossiel) b0", LabelTarget::Fuel("diesel")),
    ("lpg", LabelTarget::Fuel("lpg")),
    (
        "wind power",
        LabelTarget::Energy(EnergyUnit::Kwh, SourceColor::Green),
    ),
    (
        "grey electricity",
        LabelTarget::Energy(EnergyUnit::Kwh, SourceColor::Grey),
    ),
    (
        "green gas (average)",
        LabelTarget::Energy(EnergyUnit::CubicMeter, SourceColor::Green),
    ),
    (
        "natural gas (g-gas)",
        LabelTarget::Energy(EnergyUnit::CubicMeter, SourceColor::Grey),
    ),
    ("gasoline (fossil) e0", LabelTarget::Fuel("gasoline")),
    ("diesel (fossil) b0", LabelTarget::Fuel("diesel")),
];

/// Look up the store target for an already normalized label.
pub fn canonical_target(normalized_label: &str) -> Option<LabelTarget> {
    CANONICAL_LABELS
        .iter()
        .find(|(label, _)| *label == normalized_label)
        .map(|(_, target)| *target)
}

/// The zero-valued store shipped as a starting point for configuration files.
pub fn template() -> Result<EmissionFactorStore, FootprintError> {
    let store: EmissionFactorStore = serde_json::from_str(FACTORS_TEMPLATE_JSON)?;
    Ok(store)
}

/// The template as pretty JSON, for writing a fresh configuration file.
pub fn template_json() -> &'static str {
    FACTORS_TEMPLATE_JSON
}
