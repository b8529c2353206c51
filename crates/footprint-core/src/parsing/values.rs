use crate::model::CellValue;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Coerce a cell to a number, or treat it as absent.
///
/// Numbers pass through, text is parsed after trimming, everything else
/// (empty, booleans, unparseable text like "n/a") is absent. Absent values
/// never raise; callers reduce them to zero in sums.
pub fn coerce_number(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Number(d) => Some(*d),
        CellValue::Text(s) => parse_number(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Parse a number from text. Accepts plain decimals ("12", "-0.5") and
/// scientific notation ("1.2e3").
pub fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...). Non-finite or out-of-range
/// values are absent.
pub fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    let s = format!("{f}");
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}

/// NaN-safe sum: absent values contribute nothing.
pub fn sum_present<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    values
        .into_iter()
        .flatten()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Product of all fields, or absent if any field is absent.
pub fn product_all<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    values
        .into_iter()
        .try_fold(Decimal::ONE, |acc, v| v.map(|v| acc.saturating_mul(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_number_passthrough() {
        assert_eq!(coerce_number(&CellValue::Number(dec!(68))), Some(dec!(68)));
    }

    #[test]
    fn test_text_number() {
        assert_eq!(coerce_number(&CellValue::from(" 0.030 ")), Some(dec!(0.030)));
        assert_eq!(coerce_number(&CellValue::from("-12")), Some(dec!(-12)));
    }

    #[test]
    fn test_scientific() {
        assert_eq!(parse_number("1.5e3"), Some(dec!(1500)));
    }

    #[test]
    fn test_non_numeric_is_absent() {
        assert_eq!(coerce_number(&CellValue::from("n/a")), None);
        assert_eq!(coerce_number(&CellValue::from("")), None);
        assert_eq!(coerce_number(&CellValue::Empty), None);
        assert_eq!(coerce_number(&CellValue::Bool(true)), None);
    }

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.0035), Some(dec!(0.0035)));
        assert_eq!(f64_to_decimal(68.0), Some(dec!(68)));
        assert_eq!(f64_to_decimal(1.23), Some(dec!(1.23)));
        assert_eq!(f64_to_decimal(f64::NAN), None);
        assert_eq!(f64_to_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_sum_skips_absent() {
        let total = sum_present([Some(dec!(10)), None, Some(dec!(5))]);
        assert_eq!(total, dec!(15));
        assert_eq!(sum_present(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn test_product_requires_all_fields() {
        assert_eq!(
            product_all([Some(dec!(2)), Some(dec!(100)), Some(dec!(10))]),
            Some(dec!(2000))
        );
        assert_eq!(product_all([Some(dec!(2)), None, Some(dec!(10))]), None);
    }
}
