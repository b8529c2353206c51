use crate::error::FootprintError;
use crate::model::{EnergyUnit, SourceColor};
use crate::parsing::normalize::normalize_label;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fuel keys present in a fresh store.
pub const DEFAULT_FUELS: &[&str] = &["gasoline", "diesel", "lpg"];

/// Address of a single factor in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorKey {
    /// kg CO₂-eq per kWh or m³, by source color.
    Energy { unit: EnergyUnit, color: SourceColor },
    /// kg CO₂ per liter of fuel.
    Fuel { fuel: String },
    /// kg CO₂ per kWh for electric vehicles in a fuel ledger.
    ElectricTransport,
}

impl FactorKey {
    pub fn energy(unit: EnergyUnit, color: SourceColor) -> Self {
        FactorKey::Energy { unit, color }
    }

    /// Fuel key, normalized to the store's lowercase convention.
    pub fn fuel(name: &str) -> Self {
        FactorKey::Fuel {
            fuel: normalize_label(name),
        }
    }
}

impl fmt::Display for FactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorKey::Energy { unit, color } => write!(f, "{unit}/{color}"),
            FactorKey::Fuel { fuel } => write!(f, "fuel:{fuel}"),
            FactorKey::ElectricTransport => write!(f, "electric transport"),
        }
    }
}

/// Outcome of a factor lookup.
///
/// Unknown keys still cost zero, but callers can tell a configured zero
/// apart from a key the store has never heard of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FactorResolution {
    Resolved { factor: Decimal },
    Defaulted,
}

impl FactorResolution {
    pub fn factor(&self) -> Decimal {
        match self {
            FactorResolution::Resolved { factor } => *factor,
            FactorResolution::Defaulted => Decimal::ZERO,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, FactorResolution::Defaulted)
    }
}

/// Configurable emission factors for one session.
///
/// Energy factors form a fixed unit × color grid that is always fully
/// populated. Fuel factors are an open map keyed by lowercase fuel name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionFactorStore {
    #[serde(default = "default_energy")]
    energy: BTreeMap<EnergyUnit, BTreeMap<SourceColor, Decimal>>,
    #[serde(default = "default_fuels")]
    fuels: BTreeMap<String, Decimal>,
    #[serde(default)]
    electric_transport: Decimal,
}

fn default_energy() -> BTreeMap<EnergyUnit, BTreeMap<SourceColor, Decimal>> {
    [EnergyUnit::Kwh, EnergyUnit::CubicMeter]
        .into_iter()
        .map(|unit| {
            let colors = [SourceColor::Green, SourceColor::Grey]
                .into_iter()
                .map(|c| (c, Decimal::ZERO))
                .collect();
            (unit, colors)
        })
        .collect()
}

fn default_fuels() -> BTreeMap<String, Decimal> {
    DEFAULT_FUELS
        .iter()
        .map(|f| (f.to_string(), Decimal::ZERO))
        .collect()
}

impl Default for EmissionFactorStore {
    fn default() -> Self {
        EmissionFactorStore {
            energy: default_energy(),
            fuels: default_fuels(),
            electric_transport: Decimal::ZERO,
        }
    }
}

impl EmissionFactorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factor for `key`; anything not configured reads as zero.
    pub fn get_factor(&self, key: &FactorKey) -> Decimal {
        self.lookup(key).factor()
    }

    /// Factor for `key`, reporting whether the key is known to the store.
    pub fn lookup(&self, key: &FactorKey) -> FactorResolution {
        match key {
            FactorKey::Energy { unit, color } => FactorResolution::Resolved {
                factor: self
                    .energy
                    .get(unit)
                    .and_then(|colors| colors.get(color))
                    .copied()
                    .unwrap_or(Decimal::ZERO),
            },
            FactorKey::Fuel { fuel } => match self.fuels.get(fuel) {
                Some(&factor) => FactorResolution::Resolved { factor },
                None => FactorResolution::Defaulted,
            },
            FactorKey::ElectricTransport => FactorResolution::Resolved {
                factor: self.electric_transport,
            },
        }
    }

    /// Override a single factor. Factors must be non-negative.
    pub fn set_factor(&mut self, key: FactorKey, value: Decimal) -> Result<(), FootprintError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(FootprintError::FactorInvalid(format!(
                "factor for {key} must not be negative (got {value})"
            )));
        }
        match key {
            FactorKey::Energy { unit, color } => {
                self.energy.entry(unit).or_default().insert(color, value);
            }
            FactorKey::Fuel { fuel } => {
                self.fuels.insert(normalize_label(&fuel), value);
            }
            FactorKey::ElectricTransport => self.electric_transport = value,
        }
        Ok(())
    }

    /// Every configured factor, energy grid first.
    pub fn entries(&self) -> Vec<(FactorKey, Decimal)> {
        let mut out = Vec::new();
        for unit in [EnergyUnit::Kwh, EnergyUnit::CubicMeter] {
            for color in [SourceColor::Green, SourceColor::Grey] {
                let key = FactorKey::energy(unit, color);
                let value = self.get_factor(&key);
                out.push((key, value));
            }
        }
        for (fuel, value) in &self.fuels {
            out.push((
                FactorKey::Fuel {
                    fuel: fuel.clone(),
                },
                *value,
            ));
        }
        out.push((FactorKey::ElectricTransport, self.electric_transport));
        out
    }

    pub fn fuel_keys(&self) -> impl Iterator<Item = &str> {
        self.fuels.keys().map(|k| k.as_str())
    }
}
