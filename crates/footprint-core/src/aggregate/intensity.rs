use crate::classify::vocabulary::TrendVocabulary;
use crate::error::FootprintError;
use crate::model::Table;
use crate::parsing::normalize::{contains_any, normalize_label};
use crate::parsing::values::coerce_number;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Column positions of a trend table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendColumns {
    pub year: usize,
    pub revenue: usize,
    pub footprint: usize,
}

/// Locate the year, revenue and footprint columns by keyword substring.
///
/// For each concept the first header containing any of its keywords wins.
/// The same header may satisfy more than one concept.
pub fn detect_trend_columns(
    columns: &[String],
    vocab: &TrendVocabulary,
) -> Result<TrendColumns, FootprintError> {
    let headers: Vec<String> = columns.iter().map(|c| normalize_label(c)).collect();
    let find = |keywords: &[String]| headers.iter().position(|h| contains_any(h, keywords));

    let year = find(&vocab.year);
    let revenue = find(&vocab.revenue);
    let footprint = find(&vocab.footprint);

    match (year, revenue, footprint) {
        (Some(year), Some(revenue), Some(footprint)) => Ok(TrendColumns {
            year,
            revenue,
            footprint,
        }),
        _ => {
            let missing = [("year", year), ("revenue", revenue), ("footprint", footprint)]
                .into_iter()
                .filter(|(_, col)| col.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            Err(FootprintError::MissingTrendColumns {
                missing,
                found: columns.to_vec(),
            })
        }
    }
}

/// One raw trend row after numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendRecord {
    pub year: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub footprint: Option<Decimal>,
}

impl TrendRecord {
    pub fn new(year: Decimal, revenue: Decimal, footprint: Decimal) -> Self {
        TrendRecord {
            year: Some(year),
            revenue: Some(revenue),
            footprint: Some(footprint),
        }
    }
}

/// Read every data row of a trend table as a [`TrendRecord`].
pub fn trend_records(table: &Table, columns: &TrendColumns) -> Vec<TrendRecord> {
    (0..table.row_count())
        .map(|row| TrendRecord {
            year: coerce_number(table.cell(row, columns.year)),
            revenue: coerce_number(table.cell(row, columns.revenue)),
            footprint: coerce_number(table.cell(row, columns.footprint)),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityPoint {
    pub year: i32,
    pub revenue: Decimal,
    pub footprint: Decimal,
    /// Footprint per unit of revenue.
    pub intensity: Decimal,
}

/// Intensity points in ascending year order. Every point has revenue > 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensitySeries {
    pub points: Vec<IntensityPoint>,
}

/// Build the series from raw records.
///
/// Records with a missing field, a year outside `i32`, or revenue ≤ 0 are
/// dropped. Equal years keep their input order.
pub fn build_intensity_series(records: &[TrendRecord]) -> IntensitySeries {
    let mut points: Vec<IntensityPoint> = records
        .iter()
        .filter_map(|r| {
            let revenue = r.revenue.filter(|v| v.is_sign_positive() && !v.is_zero())?;
            let footprint = r.footprint?;
            let year = r.year?.trunc().to_i32()?;
            let intensity = footprint.checked_div(revenue)?;
            Some(IntensityPoint {
                year,
                revenue,
                footprint,
                intensity,
            })
        })
        .collect();
    let dropped = records.len() - points.len();
    if dropped > 0 {
        debug!(dropped, "trend rows dropped during cleaning");
    }
    points.sort_by_key(|p| p.year);
    IntensitySeries { points }
}

/// Relative change between two intensities, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum PercentChange {
    Defined(Decimal),
    /// The start intensity was zero.
    Undefined,
}

impl PercentChange {
    pub fn between(start: Decimal, end: Decimal) -> Self {
        end.saturating_sub(start)
            .saturating_mul(Decimal::ONE_HUNDRED)
            .checked_div(start)
            .map_or(PercentChange::Undefined, PercentChange::Defined)
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            PercentChange::Defined(v) => Some(*v),
            PercentChange::Undefined => None,
        }
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Defined(v) if v.is_sign_positive() && !v.is_zero() => {
                write!(f, "+{v:.1}%")
            }
            PercentChange::Defined(v) => write!(f, "{v:.1}%"),
            PercentChange::Undefined => write!(f, "undefined"),
        }
    }
}

/// Verdict on an intensity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendAssessment {
    /// Dropped by more than 5 %.
    Excellent,
    Good,
    Stable,
    AttentionNeeded,
}

impl TrendAssessment {
    pub fn from_change(pct: Decimal) -> Self {
        if pct < Decimal::from(-5) {
            TrendAssessment::Excellent
        } else if pct < Decimal::ZERO {
            TrendAssessment::Good
        } else if pct < Decimal::from(5) {
            TrendAssessment::Stable
        } else {
            TrendAssessment::AttentionNeeded
        }
    }
}

impl fmt::Display for TrendAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendAssessment::Excellent => write!(f, "excellent: intensity fell significantly"),
            TrendAssessment::Good => write!(f, "good: intensity fell"),
            TrendAssessment::Stable => write!(f, "stable: intensity stayed roughly level"),
            TrendAssessment::AttentionNeeded => write!(f, "attention needed: intensity rose"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensitySummary {
    pub start: IntensityPoint,
    pub end: IntensityPoint,
    pub percent_change: PercentChange,
    /// `None` when the change is undefined.
    pub assessment: Option<TrendAssessment>,
    /// Lowest intensity; the earliest year wins a tie.
    pub best: IntensityPoint,
}

impl IntensitySeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Start, end, change and best year. Needs at least two points.
    pub fn summary(&self) -> Option<IntensitySummary> {
        if self.points.len() < 2 {
            return None;
        }
        let start = *self.points.first()?;
        let end = *self.points.last()?;
        let best = self
            .points
            .iter()
            .copied()
            .reduce(|best, p| if p.intensity < best.intensity { p } else { best })?;
        let percent_change = PercentChange::between(start.intensity, end.intensity);

        Some(IntensitySummary {
            start,
            end,
            percent_change,
            assessment: percent_change.value().map(TrendAssessment::from_change),
            best,
        })
    }
}

/// Result of the trend path for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityAnalysis {
    pub sheet: String,
    pub columns: TrendColumns,
    pub series: IntensitySeries,
    pub summary: Option<IntensitySummary>,
}

/// Detect trend columns, clean the rows and summarize the series.
///
/// Fails without partial output when a trend column is missing or when no
/// row survives cleaning.
pub fn analyze_intensity(
    table: &Table,
    vocab: &TrendVocabulary,
) -> Result<IntensityAnalysis, FootprintError> {
    let columns = detect_trend_columns(&table.columns, vocab)?;
    debug!(sheet = %table.name, ?columns, "trend columns detected");

    let series = build_intensity_series(&trend_records(table, &columns));
    if series.is_empty() {
        return Err(FootprintError::NoTrendData);
    }
    let summary = series.summary();
    info!(sheet = %table.name, points = series.len(), "intensity series built");

    Ok(IntensityAnalysis {
        sheet: table.name.clone(),
        columns,
        series,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use rust_decimal_macros::dec;

    fn records() -> Vec<TrendRecord> {
        vec![
            TrendRecord::new(dec!(2022), dec!(50), dec!(30)),
            TrendRecord::new(dec!(2020), dec!(100), dec!(50)),
            TrendRecord::new(dec!(2021), dec!(100), dec!(40)),
        ]
    }

    #[test]
    fn series_is_sorted_by_year() {
        let series = build_intensity_series(&records());
        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
        let intensity: Vec<Decimal> = series.points.iter().map(|p| p.intensity).collect();
        assert_eq!(intensity, vec![dec!(0.5), dec!(0.4), dec!(0.6)]);
    }

    #[test]
    fn summary_reports_change_and_best_year() {
        let summary = build_intensity_series(&records()).summary().unwrap();
        assert_eq!(summary.start.year, 2020);
        assert_eq!(summary.end.year, 2022);
        assert_eq!(summary.percent_change, PercentChange::Defined(dec!(20)));
        assert_eq!(summary.assessment, Some(TrendAssessment::AttentionNeeded));
        assert_eq!(summary.best.year, 2021);
        assert_eq!(summary.best.intensity, dec!(0.4));
    }

    #[test]
    fn zero_start_intensity_is_undefined() {
        let series = build_intensity_series(&[
            TrendRecord::new(dec!(2020), dec!(100), dec!(0)),
            TrendRecord::new(dec!(2021), dec!(100), dec!(10)),
        ]);
        let summary = series.summary().unwrap();
        assert_eq!(summary.percent_change, PercentChange::Undefined);
        assert_eq!(summary.assessment, None);
        assert_eq!(summary.percent_change.to_string(), "undefined");
    }

    #[test]
    fn invalid_rows_are_dropped() {
        let series = build_intensity_series(&[
            TrendRecord::new(dec!(2019), dec!(0), dec!(10)),
            TrendRecord::new(dec!(2020), dec!(-5), dec!(10)),
            TrendRecord {
                year: Some(dec!(2021)),
                revenue: None,
                footprint: Some(dec!(1)),
            },
            TrendRecord::new(dec!(2022), dec!(10), dec!(1)),
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].year, 2022);
        assert!(series.summary().is_none());
    }

    #[test]
    fn assessment_thresholds() {
        assert_eq!(TrendAssessment::from_change(dec!(-10)), TrendAssessment::Excellent);
        assert_eq!(TrendAssessment::from_change(dec!(-5)), TrendAssessment::Good);
        assert_eq!(TrendAssessment::from_change(dec!(0)), TrendAssessment::Stable);
        assert_eq!(TrendAssessment::from_change(dec!(4.9)), TrendAssessment::Stable);
        assert_eq!(TrendAssessment::from_change(dec!(5)), TrendAssessment::AttentionNeeded);
    }

    #[test]
    fn detects_columns_by_substring() {
        let columns: Vec<String> = ["Boekjaar", "Omzet (miljoen €)", "CO₂-Footprint (ton)"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cols = detect_trend_columns(&columns, &TrendVocabulary::default()).unwrap();
        assert_eq!(cols, TrendColumns { year: 0, revenue: 1, footprint: 2 });
    }

    #[test]
    fn missing_columns_are_reported() {
        let columns = vec!["Jaar".to_string(), "Opmerking".to_string()];
        let err = detect_trend_columns(&columns, &TrendVocabulary::default()).unwrap_err();
        match err {
            FootprintError::MissingTrendColumns { missing, found } => {
                assert_eq!(missing, vec!["revenue".to_string(), "footprint".to_string()]);
                assert_eq!(found, columns);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn analyze_table_end_to_end() {
        let mut table = Table::new("Trend", &["Jaar", "Omzet", "CO2 (ton)"]);
        table.push_row(vec![2020.into(), 100.into(), 50.into()]);
        table.push_row(vec![2021.into(), "n.b.".into(), 40.into()]);
        table.push_row(vec![2022.into(), 50.into(), 30.into()]);
        let analysis = analyze_intensity(&table, &TrendVocabulary::default()).unwrap();
        assert_eq!(analysis.series.len(), 2);
        assert_eq!(analysis.summary.unwrap().best.year, 2020);
    }

    #[test]
    fn analyze_without_valid_rows_fails() {
        let mut table = Table::new("Trend", &["Jaar", "Omzet", "CO2"]);
        table.push_row(vec![2020.into(), CellValue::Empty, 50.into()]);
        let err = analyze_intensity(&table, &TrendVocabulary::default()).unwrap_err();
        assert!(matches!(err, FootprintError::NoTrendData));
    }
}
