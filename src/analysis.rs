//! One recomputation pass over the catalog for a given filter and selection.
//!
//! [`analyze`] borrows from the [`DataContext`]; [`Report`] is the owned,
//! display-ready digest the UI keeps between interactions.

use crate::data::context::DataContext;
use crate::data::filter::{filter_records, FilterCriteria};
use crate::data::model::WineRecord;
use crate::estimate::{self, Comparison, PriceEstimate, Reduction, VintageComparison};
use crate::stats::{self, CategoryColumn, Histogram, Metrics, NumericColumn};

pub const TOP_VARIETIES: usize = 15;
pub const TOP_COUNTRIES: usize = 5;
pub const CLOUD_WORDS: usize = 80;

/// Everything derived from one (criteria, selection) snapshot.
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    pub filtered: Vec<&'a WineRecord>,
    pub price: Metrics,
    pub points: Metrics,
    pub countries_represented: usize,
    /// Selected client bottle and its estimate.
    pub bottle: Option<(&'a WineRecord, PriceEstimate<'a>)>,
}

/// Filter the catalog, aggregate it, and estimate the selected client bottle.
pub fn analyze<'a>(
    ctx: &'a DataContext,
    criteria: &FilterCriteria,
    selected_title: Option<&str>,
) -> Analysis<'a> {
    let filtered = filter_records(ctx.catalog.records(), criteria);
    let bottle = selected_title
        .and_then(|t| ctx.clients.find_by_title(t))
        .map(|r| (r, estimate::estimate(r, &filtered, &ctx.catalog)));
    let countries_represented =
        stats::distinct_count(filtered.iter().copied(), CategoryColumn::Country);

    Analysis {
        price: Metrics::of(filtered.iter().copied(), NumericColumn::Price),
        points: Metrics::of(filtered.iter().copied(), NumericColumn::Points),
        countries_represented,
        bottle,
        filtered,
    }
}

// ---------------------------------------------------------------------------
// Owned report
// ---------------------------------------------------------------------------

/// One comparison group ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub reduction: Reduction,
    pub estimate: Option<f64>,
    pub count: usize,
    pub histogram: Option<Histogram>,
}

impl GroupReport {
    fn from_comparison(cmp: &Comparison<'_>, bins: usize) -> Self {
        let histogram = if cmp.is_insufficient() {
            None
        } else {
            Histogram::build(&cmp.prices(), bins)
        };
        GroupReport {
            reduction: cmp.reduction,
            estimate: cmp.estimate,
            count: cmp.records.len(),
            histogram,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BottleReport {
    pub record: WineRecord,
    /// Headline estimate; also marks the comparison histograms.
    pub estimated_price: Option<f64>,
    pub similar: GroupReport,
    /// `None` when the title carries no year.
    pub vintage: Option<(String, GroupReport)>,
    pub country: GroupReport,
    pub variety: GroupReport,
}

/// Display-ready digest of an [`Analysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_wines: usize,
    pub price: Metrics,
    pub points: Metrics,
    pub countries_represented: usize,
    pub top_varieties: Vec<(String, usize)>,
    pub country_counts: Vec<(String, usize)>,
    /// Price distribution of the most represented countries, on shared bins.
    pub top_country_prices: Vec<(String, Histogram)>,
    pub variety_cloud: Vec<(String, usize)>,
    pub bottle: Option<BottleReport>,
}

impl Report {
    pub fn from_analysis(analysis: &Analysis<'_>, bins: usize) -> Self {
        let filtered = &analysis.filtered;
        let country_counts =
            stats::value_counts(filtered.iter().copied(), CategoryColumn::Country, None);

        let top: Vec<&str> = country_counts
            .iter()
            .take(TOP_COUNTRIES)
            .map(|(c, _)| c.as_str())
            .collect();
        let top_prices: Vec<(&str, Vec<f64>)> = top
            .iter()
            .map(|&c| {
                let prices = filtered
                    .iter()
                    .filter(|r| r.country.as_deref() == Some(c))
                    .filter_map(|r| NumericColumn::Price.value(r))
                    .collect();
                (c, prices)
            })
            .collect();
        let all_top: Vec<f64> = top_prices
            .iter()
            .flat_map(|(_, p)| p.iter().copied())
            .collect();
        let top_country_prices = match Metrics::from_values(all_top).summary {
            Some(s) => top_prices
                .iter()
                .filter_map(|(c, prices)| {
                    Histogram::build_in(prices, s.min..=s.max, bins)
                        .map(|h| (c.to_string(), h))
                })
                .collect(),
            None => Vec::new(),
        };

        let bottle = analysis.bottle.as_ref().map(|(record, est)| BottleReport {
            record: (*record).clone(),
            estimated_price: est.estimated_price(),
            similar: GroupReport::from_comparison(&est.similar, bins),
            vintage: match &est.vintage {
                VintageComparison::Year { year, comparison } => {
                    let group = GroupReport::from_comparison(comparison, bins);
                    Some((year.clone(), group))
                }
                VintageComparison::NoYear => None,
            },
            country: GroupReport::from_comparison(&est.country, bins),
            variety: GroupReport::from_comparison(&est.variety, bins),
        });

        Report {
            total_wines: filtered.len(),
            price: analysis.price,
            points: analysis.points,
            countries_represented: analysis.countries_represented,
            top_varieties: stats::value_counts(
                filtered.iter().copied(),
                CategoryColumn::Variety,
                Some(TOP_VARIETIES),
            ),
            country_counts,
            top_country_prices,
            variety_cloud: stats::value_counts(
                filtered.iter().copied(),
                CategoryColumn::Variety,
                Some(CLOUD_WORDS),
            ),
            bottle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Selection;
    use crate::data::model::{Catalog, ClientCatalog};

    fn context() -> DataContext {
        DataContext {
            catalog: Catalog::from_records(vec![
                WineRecord::sample("France", "Pinot Noir", Some(20.0), 88, "A 2015"),
                WineRecord::sample("France", "Pinot Noir", Some(30.0), 90, "B 2016"),
                WineRecord::sample("France", "Pinot Noir", Some(40.0), 92, "C 2015"),
                WineRecord::sample("Italy", "Nebbiolo", Some(60.0), 95, "D 2010"),
                WineRecord::sample("Spain", "Tempranillo", Some(12.0), 84, "E"),
            ]),
            clients: ClientCatalog::from_records(vec![
                WineRecord::sample("France", "Pinot Noir", None, 90, "Client Bourgogne 2015"),
                WineRecord::sample("Portugal", "Touriga", None, 90, "Client Douro"),
            ]),
        }
    }

    #[test]
    fn analysis_of_full_catalog() {
        let ctx = context();
        let crit = FilterCriteria::for_catalog(&ctx.catalog);
        let a = analyze(&ctx, &crit, Some("Client Bourgogne 2015"));

        assert_eq!(a.filtered.len(), 5);
        assert_eq!(a.countries_represented, 3);
        assert_eq!(a.price.summary.map(|s| s.median), Some(30.0));

        let (reference, est) = a.bottle.as_ref().unwrap();
        assert_eq!(reference.title, "Client Bourgogne 2015");
        assert_eq!(est.estimated_price(), Some(30.0));
        assert_eq!(est.vintage.year(), Some("2015"));
    }

    #[test]
    fn empty_view_reports_no_data_but_catalog_groups_still_compute() {
        let ctx = context();
        let mut crit = FilterCriteria::for_catalog(&ctx.catalog);
        crit.countries = Selection::Only(Default::default());
        let a = analyze(&ctx, &crit, Some("Client Bourgogne 2015"));
        let report = Report::from_analysis(&a, 10);

        assert_eq!(report.total_wines, 0);
        assert_eq!(report.price.summary, None);
        assert!(report.top_varieties.is_empty());
        assert!(report.top_country_prices.is_empty());

        let bottle = report.bottle.unwrap();
        assert_eq!(bottle.estimated_price, None);
        assert_eq!(bottle.similar.histogram, None);
        assert_eq!(bottle.country.estimate, Some(30.0));
        assert_eq!(bottle.country.count, 3);
        let (year, vintage) = bottle.vintage.unwrap();
        assert_eq!(year, "2015");
        assert_eq!(vintage.count, 2);
    }

    #[test]
    fn report_ranks_countries_and_varieties() {
        let ctx = context();
        let crit = FilterCriteria::for_catalog(&ctx.catalog);
        let report = Report::from_analysis(&analyze(&ctx, &crit, Some("Client Douro")), 4);

        assert_eq!(report.country_counts[0], ("France".to_string(), 3));
        assert_eq!(report.top_varieties[0], ("Pinot Noir".to_string(), 3));
        assert_eq!(report.top_country_prices.len(), 3);
        let france = &report.top_country_prices[0].1;
        assert_eq!(france.total(), 3);
        assert_eq!(france.bins.first().map(|b| b.start), Some(12.0));

        let bottle = report.bottle.unwrap();
        assert_eq!(bottle.vintage, None);
        assert_eq!(bottle.country.estimate, None);
    }

    #[test]
    fn unpriced_group_keeps_its_count_but_draws_no_histogram() {
        let mut ctx = context();
        ctx.catalog = Catalog::from_records(vec![
            WineRecord::sample("Portugal", "Baga", None, 86, "F 2012"),
            WineRecord::sample("Portugal", "Baga", None, 87, "G 2013"),
        ]);
        let crit = FilterCriteria::for_catalog(&ctx.catalog);
        let report = Report::from_analysis(&analyze(&ctx, &crit, Some("Client Douro")), 10);

        let country = report.bottle.unwrap().country;
        assert_eq!(country.count, 2);
        assert_eq!(country.estimate, None);
        assert_eq!(country.histogram, None);
    }

    #[test]
    fn no_selection_means_no_bottle() {
        let ctx = context();
        let crit = FilterCriteria::for_catalog(&ctx.catalog);
        assert!(analyze(&ctx, &crit, None).bottle.is_none());
        let unknown = analyze(&ctx, &crit, Some("not a client title"));
        assert!(unknown.bottle.is_none());
    }
}
