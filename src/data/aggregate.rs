//! KPI scalars and chart series computed from a [`FilteredView`].
//!
//! Every function here accepts an empty view and returns zero or an empty
//! series for it. Callers still check [`FilteredView::is_empty`] first and
//! show a "no data" state instead of meaningless zeros.
//!
//! Rounding is half away from zero (`f64::round`) and is applied to the mean,
//! never to the inputs.

use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::Attribute;

// ---------------------------------------------------------------------------
// KPI scalars
// ---------------------------------------------------------------------------

/// Sum of `Total`, fractional cents dropped (truncated, not rounded).
pub fn total_sales(view: &FilteredView<'_>) -> i64 {
    view.records().map(|r| r.total).sum::<f64>().trunc() as i64
}

/// Mean `Rating` rounded to one decimal; 0.0 for an empty view.
pub fn average_rating(view: &FilteredView<'_>) -> f64 {
    mean(view.records().map(|r| r.rating)).map_or(0.0, |m| round_to(m, 1))
}

/// Mean `Total` rounded to two decimals; 0.0 for an empty view.
pub fn average_sale_per_transaction(view: &FilteredView<'_>) -> f64 {
    mean(view.records().map(|r| r.total)).map_or(0.0, |m| round_to(m, 2))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// The three headline numbers plus the star row shown next to the rating.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub total_sales: i64,
    pub average_rating: f64,
    /// Average rating rounded to a whole number of stars.
    pub star_count: u8,
    pub average_sale: f64,
    pub transactions: usize,
}

impl KpiSummary {
    /// `None` when the view is empty.
    pub fn compute(view: &FilteredView<'_>) -> Option<Self> {
        if view.is_empty() {
            return None;
        }
        let average_rating = average_rating(view);
        Some(KpiSummary {
            total_sales: total_sales(view),
            average_rating,
            star_count: average_rating.round_ties_even().clamp(0.0, u8::MAX as f64) as u8,
            average_sale: average_sale_per_transaction(view),
            transactions: view.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Grouped sums
// ---------------------------------------------------------------------------

/// Sum of `Total` per value of `attribute`, ordered by key.
pub fn group_sum(view: &FilteredView<'_>, attribute: Attribute) -> Vec<(String, f64)> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in view.records() {
        *groups.entry(rec.value(attribute)).or_default() += rec.total;
    }
    groups
        .into_iter()
        .map(|(key, sum)| (key.to_string(), sum))
        .collect()
}

/// Sales per product line, smallest first (largest bar ends up on top of a
/// horizontal bar chart).
pub fn sales_by_product_line(view: &FilteredView<'_>) -> Vec<(String, f64)> {
    let mut series = group_sum(view, Attribute::ProductLine);
    series.sort_by(|a, b| a.1.total_cmp(&b.1));
    series
}

/// Sales per hour of day, ascending. Hours with no sales are absent, not zero.
pub fn sales_by_hour(view: &FilteredView<'_>) -> Vec<(u8, f64)> {
    let mut hours: BTreeMap<u8, f64> = BTreeMap::new();
    for rec in view.records() {
        *hours.entry(rec.hour).or_default() += rec.total;
    }
    hours.into_iter().collect()
}

/// One `[Total, gross income]` point per record, unaggregated.
pub fn income_scatter(view: &FilteredView<'_>) -> Vec<[f64; 2]> {
    view.records().map(|r| [r.total, r.gross_income]).collect()
}

/// Every series the dashboard draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub sales_by_product_line: Vec<(String, f64)>,
    pub sales_by_hour: Vec<(u8, f64)>,
    pub gender_share: Vec<(String, f64)>,
    pub product_line_share: Vec<(String, f64)>,
    pub city_share: Vec<(String, f64)>,
    pub income_scatter: Vec<[f64; 2]>,
}

impl ChartSeries {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        ChartSeries {
            sales_by_product_line: sales_by_product_line(view),
            sales_by_hour: sales_by_hour(view),
            gender_share: group_sum(view, Attribute::Gender),
            product_line_share: group_sum(view, Attribute::ProductLine),
            city_share: group_sum(view, Attribute::City),
            income_scatter: income_scatter(view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterSelection};
    use crate::data::model::fixtures::{record, small_dataset};
    use crate::data::model::Dataset;
    use pretty_assertions::assert_eq;

    fn all_of(ds: &Dataset) -> FilteredView<'_> {
        filter(ds, &FilterSelection::all(ds))
    }

    #[test]
    fn test_total_sales_sums_included_records_only() {
        let ds = small_dataset();
        assert_eq!(total_sales(&all_of(&ds)), 1000);

        let view = FilteredView::from_indices(&ds, vec![0, 2]);
        // 548.97 + 340.53 = 889.50
        assert_eq!(total_sales(&view), 889);
    }

    #[test]
    fn test_total_sales_truncates() {
        let ds = Dataset::from_records(vec![
            record("Yangon", "Member", "Female", "A", 10.99, 5.0, 9),
            record("Yangon", "Member", "Female", "A", 0.99, 5.0, 9),
        ]);
        assert_eq!(total_sales(&all_of(&ds)), 11);
    }

    #[test]
    fn test_average_rating_rounds_after_mean() {
        let ds = Dataset::from_records(vec![
            record("Yangon", "Member", "Female", "A", 1.0, 4.44, 9),
            record("Yangon", "Member", "Female", "A", 1.0, 4.46, 9),
        ]);
        assert_eq!(average_rating(&all_of(&ds)), 4.5);
    }

    #[test]
    fn test_average_sale_two_decimals() {
        let ds = Dataset::from_records(vec![
            record("Yangon", "Member", "Female", "A", 10.0, 5.0, 9),
            record("Yangon", "Member", "Female", "A", 10.0, 5.0, 9),
            record("Yangon", "Member", "Female", "A", 11.0, 5.0, 9),
        ]);
        // 31 / 3 = 10.333…
        assert_eq!(average_sale_per_transaction(&all_of(&ds)), 10.33);
    }

    #[test]
    fn test_kpi_summary() {
        let ds = small_dataset();
        let kpi = KpiSummary::compute(&all_of(&ds)).unwrap();
        assert_eq!(
            kpi,
            KpiSummary {
                total_sales: 1000,
                average_rating: 8.0,
                star_count: 8,
                average_sale: 200.1,
                transactions: 5,
            }
        );
    }

    #[test]
    fn test_star_count_rounds_half_to_even() {
        let stars = |ratings: &[f64]| {
            let ds = Dataset::from_records(
                ratings
                    .iter()
                    .map(|&r| record("Yangon", "Member", "Female", "A", 1.0, r, 9))
                    .collect(),
            );
            KpiSummary::compute(&all_of(&ds)).unwrap().star_count
        };
        assert_eq!(stars(&[8.5]), 8);
        assert_eq!(stars(&[7.5]), 8);
        assert_eq!(stars(&[8.4, 8.8]), 9);
    }

    #[test]
    fn test_empty_view_is_zero_not_failure() {
        let ds = small_dataset();
        let view = FilteredView::from_indices(&ds, Vec::new());

        assert_eq!(KpiSummary::compute(&view), None);
        assert_eq!(total_sales(&view), 0);
        assert_eq!(average_rating(&view), 0.0);
        assert_eq!(average_sale_per_transaction(&view), 0.0);
        assert!(group_sum(&view, Attribute::City).is_empty());
        assert!(sales_by_hour(&view).is_empty());

        let charts = ChartSeries::compute(&view);
        assert!(charts.sales_by_product_line.is_empty());
        assert!(charts.income_scatter.is_empty());
    }

    #[test]
    fn test_product_line_sorted_ascending_by_sum() {
        let ds = Dataset::from_records(vec![
            record("Yangon", "Member", "Female", "A", 30.0, 5.0, 9),
            record("Yangon", "Member", "Female", "A", 20.0, 5.0, 9),
            record("Yangon", "Member", "Female", "B", 10.0, 5.0, 9),
        ]);
        assert_eq!(
            sales_by_product_line(&all_of(&ds)),
            vec![("B".to_string(), 10.0), ("A".to_string(), 50.0)]
        );
        // The plain group-by keeps key order.
        assert_eq!(
            group_sum(&all_of(&ds), Attribute::ProductLine),
            vec![("A".to_string(), 50.0), ("B".to_string(), 10.0)]
        );
    }

    #[test]
    fn test_sales_by_hour_is_sparse_and_ordered() {
        let ds = small_dataset();
        let hours = sales_by_hour(&all_of(&ds));
        let keys: Vec<u8> = hours.iter().map(|(h, _)| *h).collect();
        assert_eq!(keys, vec![10, 13, 20]);
        // 13h: 548.97 + 340.53
        assert!((hours[1].1 - 889.5).abs() < 1e-9);
        // 10h: 80.22 + 10.00
        assert!((hours[0].1 - 90.22).abs() < 1e-9);
    }

    #[test]
    fn test_share_series() {
        let ds = small_dataset();
        let charts = ChartSeries::compute(&all_of(&ds));

        let genders: Vec<&str> = charts.gender_share.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(genders, vec!["Female", "Male"]);
        let share_total: f64 = charts.city_share.iter().map(|(_, v)| v).sum();
        assert!((share_total - 1000.5).abs() < 1e-9);
        assert_eq!(charts.product_line_share.len(), 4);
    }

    #[test]
    fn test_scatter_has_one_point_per_record() {
        let ds = small_dataset();
        let view = FilteredView::from_indices(&ds, vec![1, 4]);
        let points = income_scatter(&view);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0][0], 80.22);
        assert_eq!(points[1][1], 10.0 / 21.0);
    }
}
