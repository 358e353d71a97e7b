use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use crate::data::model::WineRecord;

// ---------------------------------------------------------------------------
// Column accessors
// ---------------------------------------------------------------------------

/// Numeric columns the aggregator can reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Price,
    Points,
}

impl NumericColumn {
    pub fn value(self, record: &WineRecord) -> Option<f64> {
        match self {
            NumericColumn::Price => record.price.filter(|p| !p.is_nan()),
            NumericColumn::Points => record.points.map(|p| p as f64),
        }
    }
}

/// Categorical columns used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    Country,
    Variety,
}

impl CategoryColumn {
    pub fn value(self, record: &WineRecord) -> Option<&str> {
        match self {
            CategoryColumn::Country => record.country.as_deref(),
            CategoryColumn::Variety => record.variety.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Central tendency and spread of a non-empty column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Reduction of one numeric column. `summary` is `None` when no value is
/// present, which the UI shows as "no data".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub count: usize,
    pub summary: Option<Summary>,
}

impl Metrics {
    pub fn of<'a, I>(records: I, column: NumericColumn) -> Self
    where
        I: IntoIterator<Item = &'a WineRecord>,
    {
        let values: Vec<f64> = records
            .into_iter()
            .filter_map(|r| column.value(r))
            .collect();
        Metrics::from_values(values)
    }

    pub fn from_values(mut values: Vec<f64>) -> Self {
        values.retain(|v| !v.is_nan());
        let count = values.len();
        if count == 0 {
            return Metrics {
                count,
                summary: None,
            };
        }

        values.sort_by(f64::total_cmp);
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };

        Metrics {
            count,
            summary: Some(Summary {
                mean: values.iter().sum::<f64>() / count as f64,
                median,
                min: values[0],
                max: values[count - 1],
            }),
        }
    }
}

/// Mean of the present values, `None` when there are none.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Median of the present values, `None` when there are none.
pub fn median<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    Metrics::from_values(values.into_iter().collect())
        .summary
        .map(|s| s.median)
}

// ---------------------------------------------------------------------------
// Categorical counts
// ---------------------------------------------------------------------------

/// Number of distinct non-null values.
pub fn distinct_count<'a, I>(records: I, column: CategoryColumn) -> usize
where
    I: IntoIterator<Item = &'a WineRecord>,
{
    records
        .into_iter()
        .filter_map(|r| column.value(r))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Occurrences per non-null value, most frequent first; ties by name.
/// `limit` keeps only the first entries.
pub fn value_counts<'a, I>(
    records: I,
    column: CategoryColumn,
    limit: Option<usize>,
) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a WineRecord>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in records {
        if let Some(v) = column.value(rec) {
            *counts.entry(v).or_insert(0) += 1;
        }
    }

    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, n)| (k.to_string(), n))
        .collect();
    // stable sort keeps the BTreeMap's name order among ties
    out.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some(limit) = limit {
        out.truncate(limit);
    }
    out
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins over `[min, max]`. Bins are half-open except the last,
/// which includes `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// `None` for no values or `bins == 0`.
    pub fn build(values: &[f64], bins: usize) -> Option<Self> {
        let present = values.iter().copied().filter(|v| v.is_finite());
        let (min, max) = present.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;
        Self::build_in(values, min..=max, bins)
    }

    /// Bin `values` over a fixed range so several histograms line up.
    /// Values outside the range are ignored.
    pub fn build_in(values: &[f64], range: RangeInclusive<f64>, bins: usize) -> Option<Self> {
        let (min, max) = (*range.start(), *range.end());
        if bins == 0 || !min.is_finite() || !max.is_finite() || max < min {
            return None;
        }
        // a single distinct value gets one unit-wide bin
        let (min, max, bins) = if (max - min).abs() < f64::EPSILON {
            (min - 0.5, max + 0.5, 1)
        } else {
            (min, max, bins)
        };
        let width = (max - min) / bins as f64;

        let mut out: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();
        for v in values.iter().copied().filter(|v| (min..=max).contains(v)) {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }
        Some(Histogram { bins: out })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wines(prices: &[Option<f64>]) -> Vec<WineRecord> {
        prices
            .iter()
            .map(|p| WineRecord::sample("France", "Pinot Noir", *p, 90, "T"))
            .collect()
    }

    #[test]
    fn metrics_on_odd_count() {
        let recs = wines(&[Some(40.0), Some(20.0), Some(30.0)]);
        let m = Metrics::of(&recs, NumericColumn::Price);
        assert_eq!(m.count, 3);
        let s = m.summary.unwrap();
        assert_eq!((s.mean, s.median, s.min, s.max), (30.0, 30.0, 20.0, 40.0));
    }

    #[test]
    fn median_of_even_count_averages_middle_values() {
        assert_eq!(median([10.0, 40.0, 20.0, 30.0]), Some(25.0));
    }

    #[test]
    fn null_values_are_skipped() {
        let recs = wines(&[Some(10.0), None, Some(f64::NAN), Some(20.0)]);
        let m = Metrics::of(&recs, NumericColumn::Price);
        assert_eq!(m.count, 2);
        assert_eq!(m.summary.map(|s| s.mean), Some(15.0));
    }

    #[test]
    fn empty_subset_reports_no_data() {
        let m = Metrics::of(std::iter::empty(), NumericColumn::Points);
        assert_eq!(m.count, 0);
        assert_eq!(m.summary, None);
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(median(Vec::<f64>::new()), None);

        let all_null = wines(&[None, None]);
        assert_eq!(Metrics::of(&all_null, NumericColumn::Price).summary, None);
    }

    #[test]
    fn points_metrics() {
        let recs = vec![
            WineRecord::sample("France", "Gamay", None, 80, "A"),
            WineRecord::sample("France", "Gamay", None, 90, "B"),
        ];
        let m = Metrics::of(&recs, NumericColumn::Points);
        let s = m.summary.unwrap();
        assert_eq!((s.min, s.median, s.max), (80.0, 85.0, 90.0));
    }

    #[test]
    fn value_counts_orders_by_frequency_then_name() {
        let recs = vec![
            WineRecord::sample("Italy", "Nebbiolo", None, 90, "A"),
            WineRecord::sample("France", "Gamay", None, 90, "B"),
            WineRecord::sample("Spain", "Gamay", None, 90, "C"),
            WineRecord::sample("France", "Syrah", None, 90, "D"),
            WineRecord::sample("Italy", "Syrah", None, 90, "E"),
            WineRecord::sample("Chile", "Syrah", None, 90, "F"),
        ];
        assert_eq!(
            value_counts(&recs, CategoryColumn::Country, None),
            vec![
                ("France".to_string(), 2),
                ("Italy".to_string(), 2),
                ("Chile".to_string(), 1),
                ("Spain".to_string(), 1),
            ]
        );
        assert_eq!(
            value_counts(&recs, CategoryColumn::Variety, Some(2)),
            vec![("Syrah".to_string(), 3), ("Gamay".to_string(), 2)]
        );
        assert_eq!(distinct_count(&recs, CategoryColumn::Country), 4);
    }

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let h = Histogram::build(&[0.0, 1.0, 2.5, 5.0, 10.0], 4).unwrap();
        let counts: Vec<usize> = h.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1]);
        assert_eq!(h.bins[0].width(), 2.5);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn histogram_of_constant_values_has_one_bin() {
        let h = Histogram::build(&[7.0, 7.0], 30).unwrap();
        assert_eq!(h.bins.len(), 1);
        assert_eq!(h.bins[0].center(), 7.0);
        assert_eq!(h.bins[0].count, 2);
    }

    #[test]
    fn fixed_range_histograms_share_edges() {
        let a = Histogram::build_in(&[1.0, 9.0], 0.0..=10.0, 5).unwrap();
        let b = Histogram::build_in(&[4.0, 42.0], 0.0..=10.0, 5).unwrap();
        assert_eq!(
            a.bins.iter().map(|x| x.start).collect::<Vec<_>>(),
            b.bins.iter().map(|x| x.start).collect::<Vec<_>>()
        );
        assert_eq!(a.total(), 2);
        // 42 falls outside the range
        assert_eq!(b.total(), 1);
        assert_eq!(b.bins[2].count, 1);
    }

    #[test]
    fn histogram_of_nothing() {
        assert_eq!(Histogram::build(&[], 10), None);
        assert_eq!(Histogram::build(&[1.0], 0), None);
    }
}
