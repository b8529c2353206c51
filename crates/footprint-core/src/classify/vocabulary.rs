use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Accepted header names for each column the consumption models read.
///
/// Headers match exactly after trimming, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnVocabulary {
    pub fuel_type: Vec<String>,
    pub annual_fuel: Vec<String>,
    pub count: Vec<String>,
    pub power: Vec<String>,
    pub unit: Vec<String>,
    pub annual_hours: Vec<String>,
    pub brand: Vec<String>,
    pub model: Vec<String>,
}

impl Default for ColumnVocabulary {
    fn default() -> Self {
        ColumnVocabulary {
            fuel_type: words(&["Brandstof", "Fuel type", "Fuel"]),
            annual_fuel: words(&["Brandstof p/j", "Annual fuel", "Fuel per year"]),
            count: words(&["Aantal", "Count", "Quantity"]),
            power: words(&["Vermogen", "Power"]),
            unit: words(&["Eenheid", "Unit"]),
            annual_hours: words(&["Draaiuren p/j", "Annual hours", "Hours per year"]),
            brand: words(&["Merk", "Brand", "Make"]),
            model: words(&["Type", "Model"]),
        }
    }
}

/// Keywords steering fuel-label resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelVocabulary {
    /// Substrings marking a vehicle as electric.
    pub electric_keywords: Vec<String>,
    /// Substring marking a vehicle as hybrid.
    pub hybrid_keyword: String,
    /// Fuel key hybrids are costed with.
    pub hybrid_fuel: String,
    /// Ledger fuel words mapped onto a canonical fuel key, e.g. the Dutch
    /// "benzine" onto "gasoline".
    pub fuel_aliases: BTreeMap<String, String>,
}

impl FuelVocabulary {
    /// Canonical fuel key for a normalized ledger word.
    pub fn canonical_fuel<'a>(&'a self, word: &'a str) -> &'a str {
        self.fuel_aliases
            .get(word)
            .map(String::as_str)
            .unwrap_or(word)
    }
}

impl Default for FuelVocabulary {
    fn default() -> Self {
        FuelVocabulary {
            electric_keywords: words(&[
                "elektrisch",
                "elektriciteit",
                "ev",
                "electric",
                "electricity",
            ]),
            hybrid_keyword: "hybrid".into(),
            hybrid_fuel: "gasoline".into(),
            fuel_aliases: BTreeMap::from([
                ("benzine".to_string(), "gasoline".to_string()),
                ("petrol".to_string(), "gasoline".to_string()),
            ]),
        }
    }
}

/// Header substrings identifying the trend-analysis columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendVocabulary {
    pub year: Vec<String>,
    pub revenue: Vec<String>,
    pub footprint: Vec<String>,
}

impl Default for TrendVocabulary {
    fn default() -> Self {
        TrendVocabulary {
            year: words(&[
                "jaar", "year", "periode", "datum", "date", "time", "tijd", "boekjaar",
            ]),
            revenue: words(&[
                "omzet",
                "revenue",
                "turnover",
                "sales",
                "verkoop",
                "inkomsten",
                "opbrengst",
                "netto",
                "bruto",
                "facturatie",
                "totaal",
            ]),
            footprint: words(&[
                "co2",
                "co₂",
                "footprint",
                "uitstoot",
                "emissie",
                "carbon",
                "koolstof",
                "milieu",
                "duurzaam",
                "klimaat",
                "scope",
                "ghg",
                "greenhouse",
            ]),
        }
    }
}
