pub mod intensity;
pub mod summary;

use crate::calculate::outcome::ConsumptionRow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sum of row footprints. Decimal addition is exact, so the result does not
/// depend on row or sheet order.
pub fn total_footprint<'a, I>(rows: I) -> Decimal
where
    I: IntoIterator<Item = &'a ConsumptionRow>,
{
    rows.into_iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.footprint))
}

/// Field a ranking sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankField {
    Quantity,
    Footprint,
}

/// Anything that can be ranked by quantity or footprint.
pub trait Ranked {
    fn quantity(&self) -> Decimal;
    fn footprint(&self) -> Decimal;

    fn rank_value(&self, field: RankField) -> Decimal {
        match field {
            RankField::Quantity => self.quantity(),
            RankField::Footprint => self.footprint(),
        }
    }
}

impl Ranked for ConsumptionRow {
    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn footprint(&self) -> Decimal {
        self.footprint
    }
}

/// The `n` entries with the highest `field`, highest first.
///
/// Ties keep their input order.
pub fn top_n<T: Ranked + Clone>(entries: &[T], n: usize, field: RankField) -> Vec<T> {
    top_n_by(entries, n, |e| e.rank_value(field))
}

/// The `n` entries with the highest `key`, highest first, ties in input order.
pub fn top_n_by<T, F>(entries: &[T], n: usize, key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Decimal,
{
    let mut ranked: Vec<&T> = entries.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::schema::FactorResolution;
    use rust_decimal_macros::dec;

    fn row(label: &str, footprint: Decimal) -> ConsumptionRow {
        ConsumptionRow {
            sheet: "s".into(),
            label: label.into(),
            category: label.into(),
            unit: None,
            factor_key: None,
            resolution: FactorResolution::Defaulted,
            factor: Decimal::ZERO,
            quantity: footprint,
            footprint,
        }
    }

    #[test]
    fn top_n_is_descending_and_stable() {
        let rows = vec![row("a", dec!(10)), row("b", dec!(30)), row("c", dec!(30))];
        let top = top_n(&rows, 2, RankField::Footprint);
        let labels: Vec<&str> = top.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c"]);
    }

    #[test]
    fn top_n_larger_than_input() {
        let rows = vec![row("a", dec!(1)), row("b", dec!(2))];
        assert_eq!(top_n(&rows, 5, RankField::Quantity).len(), 2);
        assert!(top_n(&rows, 0, RankField::Quantity).is_empty());
    }

    #[test]
    fn total_footprint_sums_all_rows() {
        let rows = vec![row("a", dec!(30.0)), row("b", dec!(4.5))];
        assert_eq!(total_footprint(&rows), dec!(34.5));
        assert_eq!(total_footprint(&Vec::<ConsumptionRow>::new()), Decimal::ZERO);
    }

    #[test]
    fn total_footprint_order_independent() {
        let rows = vec![row("a", dec!(0.1)), row("b", dec!(0.2)), row("c", dec!(0.000000001))];
        let mut reversed = rows.clone();
        reversed.reverse();
        assert_eq!(total_footprint(&rows), total_footprint(&reversed));
    }
}
