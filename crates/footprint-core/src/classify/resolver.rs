use crate::classify::vocabulary::FuelVocabulary;
use crate::factors::schema::FactorKey;
use crate::model::{EnergyUnit, SourceColor, Unit};
use crate::parsing::normalize::{contains_any, first_token, normalize_label};
use serde::{Deserialize, Serialize};

/// Canonical category key for electric vehicles.
pub const ELECTRICITY: &str = "electricity";

/// Which resolution rule matched a fuel label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelMatch {
    Electric,
    Hybrid,
    FirstToken,
}

/// Canonical category and unit for a fuel-ledger label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelCategory {
    /// Canonical key, e.g. "electricity", "gasoline", "diesel".
    pub category: String,
    pub unit: Unit,
    pub matched_by: FuelMatch,
}

impl FuelCategory {
    /// Store address of this category's factor.
    pub fn factor_key(&self) -> FactorKey {
        match self.matched_by {
            FuelMatch::Electric => FactorKey::ElectricTransport,
            FuelMatch::Hybrid | FuelMatch::FirstToken => FactorKey::Fuel {
                fuel: self.category.clone(),
            },
        }
    }
}

/// Map a free-text fuel/vehicle label to a canonical category.
///
/// On the lowercased label: any electric keyword gives electricity in kWh;
/// otherwise the hybrid keyword gives the hybrid fallback fuel in liters;
/// otherwise the first whitespace token, after fuel aliases, is taken as the
/// fuel key, in liters.
/// A first token that is not a configured fuel costs zero downstream.
pub fn resolve_fuel_category(label: &str, vocab: &FuelVocabulary) -> FuelCategory {
    let lower = normalize_label(label);

    if contains_any(&lower, &vocab.electric_keywords) {
        return FuelCategory {
            category: ELECTRICITY.into(),
            unit: Unit::Energy(EnergyUnit::Kwh),
            matched_by: FuelMatch::Electric,
        };
    }

    let hybrid = normalize_label(&vocab.hybrid_keyword);
    if !hybrid.is_empty() && lower.contains(hybrid.as_str()) {
        return FuelCategory {
            category: normalize_label(&vocab.hybrid_fuel),
            unit: Unit::Liter,
            matched_by: FuelMatch::Hybrid,
        };
    }

    let token = first_token(&lower).unwrap_or_default();
    FuelCategory {
        category: vocab.canonical_fuel(token).to_string(),
        unit: Unit::Liter,
        matched_by: FuelMatch::FirstToken,
    }
}

/// Factor key for an equipment sheet's declared unit.
///
/// Energy units take the operator's color choice, liter units the
/// operator's fuel choice. Any other unit, or no unit, has no key and
/// costs zero.
pub fn resolve_equipment_unit(
    unit: Option<&Unit>,
    color: SourceColor,
    fuel: &str,
) -> Option<FactorKey> {
    match unit? {
        Unit::Energy(energy) => Some(FactorKey::energy(*energy, color)),
        Unit::Liter => Some(FactorKey::fuel(fuel)),
        Unit::Other(_) => None,
    }
}
