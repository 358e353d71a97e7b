//! Price estimation for a reference bottle.
//!
//! Four comparison groups are computed independently and reported side by
//! side. Only the similar-match group looks at the filtered view; the other
//! three always use the full catalog.

use std::sync::LazyLock;

use regex::Regex;

use crate::data::model::{Catalog, WineRecord};
use crate::stats;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid year pattern"));

/// First run of four ASCII digits in `title`. A longer run yields its first
/// four digits.
pub fn extract_vintage_year(title: &str) -> Option<&str> {
    YEAR_RE.find(title).map(|m| m.as_str())
}

/// How an estimate is reduced from its supporting prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    Median,
}

/// Outcome of one comparison group.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'a> {
    pub reduction: Reduction,
    /// `None` means insufficient data.
    pub estimate: Option<f64>,
    pub records: Vec<&'a WineRecord>,
}

impl<'a> Comparison<'a> {
    fn compute(records: Vec<&'a WineRecord>, reduction: Reduction) -> Self {
        let prices = records.iter().filter_map(|r| r.price);
        let estimate = match reduction {
            Reduction::Mean => stats::mean(prices),
            Reduction::Median => stats::median(prices),
        };
        Comparison {
            reduction,
            estimate,
            records,
        }
    }

    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.price).collect()
    }

    pub fn is_insufficient(&self) -> bool {
        self.estimate.is_none()
    }
}

/// The vintage group, omitted when the title carries no year.
#[derive(Debug, Clone, PartialEq)]
pub enum VintageComparison<'a> {
    NoYear,
    Year {
        year: String,
        comparison: Comparison<'a>,
    },
}

impl VintageComparison<'_> {
    pub fn year(&self) -> Option<&str> {
        match self {
            VintageComparison::NoYear => None,
            VintageComparison::Year { year, .. } => Some(year),
        }
    }
}

/// All four reference points for one bottle.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceEstimate<'a> {
    /// Median price of same country and variety within the filtered view.
    pub similar: Comparison<'a>,
    /// Mean price of catalog titles containing the same year.
    pub vintage: VintageComparison<'a>,
    pub country: Comparison<'a>,
    pub variety: Comparison<'a>,
}

impl PriceEstimate<'_> {
    /// The headline estimate shown to the user.
    pub fn estimated_price(&self) -> Option<f64> {
        self.similar.estimate
    }
}

fn same(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Compare `reference` against the filtered view and the full catalog.
///
/// A null country or variety on the reference matches nothing, so the
/// groups depending on it report insufficient data.
pub fn estimate<'a>(
    reference: &WineRecord,
    filtered: &[&'a WineRecord],
    catalog: &'a Catalog,
) -> PriceEstimate<'a> {
    let country = reference.country.as_deref();
    let variety = reference.variety.as_deref();

    let similar: Vec<&WineRecord> = filtered
        .iter()
        .copied()
        .filter(|r| same(r.country.as_deref(), country) && same(r.variety.as_deref(), variety))
        .collect();

    // raw substring test: "1999" also matches a title containing "19995"
    let vintage = match extract_vintage_year(&reference.title) {
        Some(year) => VintageComparison::Year {
            year: year.to_string(),
            comparison: Comparison::compute(
                catalog
                    .records()
                    .iter()
                    .filter(|r| r.title.contains(year))
                    .collect(),
                Reduction::Mean,
            ),
        },
        None => VintageComparison::NoYear,
    };

    let same_country = catalog
        .records()
        .iter()
        .filter(|r| same(r.country.as_deref(), country))
        .collect();
    let same_variety = catalog
        .records()
        .iter()
        .filter(|r| same(r.variety.as_deref(), variety))
        .collect();

    let result = PriceEstimate {
        similar: Comparison::compute(similar, Reduction::Median),
        vintage,
        country: Comparison::compute(same_country, Reduction::Mean),
        variety: Comparison::compute(same_variety, Reduction::Mean),
    };
    log::debug!(
        "Estimate for '{}': similar={:?} vintage={:?} country={:?} variety={:?}",
        reference.title,
        result.similar.estimate,
        result.vintage.year(),
        result.country.estimate,
        result.variety.estimate
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_records, FilterCriteria, Selection};

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            WineRecord::sample("France", "Pinot Noir", Some(20.0), 88, "A 2015 Volnay"),
            WineRecord::sample("France", "Pinot Noir", Some(40.0), 90, "B 2016 Pommard"),
            WineRecord::sample("France", "Pinot Noir", Some(30.0), 89, "C 2015 Beaune"),
            WineRecord::sample("France", "Syrah", Some(50.0), 92, "D 2015 Cornas"),
            WineRecord::sample("Italy", "Pinot Noir", Some(25.0), 87, "E 2012"),
            WineRecord::sample("Chile", "Carmenère", Some(15.0), 86, "F"),
        ])
    }

    #[test]
    fn year_is_first_four_digit_run() {
        assert_eq!(extract_vintage_year("Chateau X 2015 Reserve"), Some("2015"));
        assert_eq!(extract_vintage_year("Cuvée Spéciale"), None);
        assert_eq!(extract_vintage_year("Lot 12 2009 1999"), Some("2009"));
        assert_eq!(extract_vintage_year("Code 123456"), Some("1234"));
        assert_eq!(extract_vintage_year("N.V. 750ml"), None);
    }

    #[test]
    fn similar_match_is_median_of_filtered_view() {
        let cat = catalog();
        let filtered: Vec<&WineRecord> = cat.records().iter().collect();
        let reference = WineRecord::sample("France", "Pinot Noir", Some(99.0), 90, "Client wine");

        let est = estimate(&reference, &filtered, &cat);
        assert_eq!(est.similar.records.len(), 3);
        assert_eq!(est.estimated_price(), Some(30.0));
        assert_eq!(est.similar.reduction, Reduction::Median);
    }

    #[test]
    fn similar_match_respects_filters_but_other_groups_do_not() {
        let cat = catalog();
        let mut crit = FilterCriteria::for_catalog(&cat);
        crit.countries = Selection::Only(["Chile".to_string()].into());
        let filtered = filter_records(cat.records(), &crit);
        let reference = WineRecord::sample("France", "Pinot Noir", None, 90, "Bourgogne 2015");

        let est = estimate(&reference, &filtered, &cat);
        assert!(est.similar.is_insufficient());
        assert!(est.similar.records.is_empty());
        // 20, 40, 30, 50
        assert_eq!(est.country.estimate, Some(35.0));
        // 20, 40, 30, 25
        assert_eq!(est.variety.estimate, Some(28.75));
        match &est.vintage {
            VintageComparison::Year { year, comparison } => {
                assert_eq!(year, "2015");
                assert_eq!(comparison.records.len(), 3);
                assert_eq!(comparison.estimate, Some((20.0 + 30.0 + 50.0) / 3.0));
            }
            other => panic!("expected a vintage group, got {other:?}"),
        }
    }

    #[test]
    fn missing_year_omits_only_the_vintage_group() {
        let cat = catalog();
        let filtered: Vec<&WineRecord> = cat.records().iter().collect();
        let reference = WineRecord::sample("Chile", "Carmenère", None, 85, "Cuvée Spéciale");

        let est = estimate(&reference, &filtered, &cat);
        assert_eq!(est.vintage, VintageComparison::NoYear);
        assert_eq!(est.vintage.year(), None);
        assert_eq!(est.similar.estimate, Some(15.0));
        assert_eq!(est.country.estimate, Some(15.0));
        assert_eq!(est.variety.estimate, Some(15.0));
    }

    #[test]
    fn unknown_year_and_country_report_insufficient_data() {
        let cat = catalog();
        let reference = WineRecord::sample("Greece", "Assyrtiko", None, 90, "Santorini 1987");

        let est = estimate(&reference, &[], &cat);
        assert!(est.similar.is_insufficient());
        assert!(est.country.is_insufficient());
        assert!(est.variety.is_insufficient());
        match est.vintage {
            VintageComparison::Year { comparison, .. } => assert!(comparison.is_insufficient()),
            VintageComparison::NoYear => panic!("title carries a year"),
        }
    }

    #[test]
    fn year_match_is_a_raw_substring_test() {
        let cat = Catalog::from_records(vec![
            WineRecord::sample("France", "Gamay", Some(10.0), 85, "Morgon 1999"),
            WineRecord::sample("France", "Gamay", Some(30.0), 85, "Lot 19990 Fleurie"),
            WineRecord::sample("France", "Gamay", Some(99.0), 85, "Brouilly 2000"),
        ]);
        let reference = WineRecord::sample("France", "Gamay", None, 85, "Chiroubles 1999");

        let est = estimate(&reference, &[], &cat);
        let VintageComparison::Year { comparison, .. } = est.vintage else {
            panic!("title carries a year");
        };
        assert_eq!(comparison.estimate, Some(20.0));
    }

    #[test]
    fn null_reference_country_matches_nothing() {
        let mut unknown = WineRecord::sample("France", "Gamay", Some(10.0), 85, "A");
        unknown.country = None;
        let cat = Catalog::from_records(vec![unknown.clone()]);

        let est = estimate(&unknown, &cat.records().iter().collect::<Vec<_>>(), &cat);
        assert!(est.similar.is_insufficient());
        assert!(est.country.is_insufficient());
        assert_eq!(est.variety.estimate, Some(10.0));
    }
}
