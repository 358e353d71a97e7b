use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{Catalog, WineRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which categories and ranges are selected
// ---------------------------------------------------------------------------

/// Set-membership selection over a categorical column.
///
/// `All` removes the column from the conjunction. `Only` keeps records whose
/// value is in the set; an empty set keeps nothing and a null value never
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => value.is_some_and(|v| set.contains(v)),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Whether `value` is explicitly or implicitly selected.
    pub fn contains(&self, value: &str) -> bool {
        self.matches(Some(value))
    }

    /// Flip one value. Leaving `All` starts from the empty set.
    pub fn toggle(&mut self, value: &str) {
        match self {
            Selection::All => {
                *self = Selection::Only(BTreeSet::from([value.to_string()]));
            }
            Selection::Only(set) => {
                if !set.remove(value) {
                    set.insert(value.to_string());
                }
            }
        }
    }
}

/// A conjunction of predicates over the catalog. Ranges are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub countries: Selection,
    pub varieties: Selection,
    pub price: RangeInclusive<f64>,
    pub points: RangeInclusive<i64>,
}

impl FilterCriteria {
    /// Criteria spanning the whole catalog: every category, full observed ranges.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let price = catalog
            .price_bounds()
            .map(|b| b.min.floor()..=b.max.ceil())
            .unwrap_or(0.0..=0.0);
        let points = catalog
            .points_bounds()
            .map(|b| b.min..=b.max)
            .unwrap_or(0..=100);
        FilterCriteria {
            countries: Selection::All,
            varieties: Selection::All,
            price,
            points,
        }
    }

    /// Whether `record` passes every predicate. Null price or points fail
    /// their range.
    pub fn matches(&self, record: &WineRecord) -> bool {
        self.countries.matches(record.country.as_deref())
            && self.varieties.matches(record.variety.as_deref())
            && record.price.is_some_and(|p| self.price.contains(&p))
            && record.points.is_some_and(|p| self.points.contains(&p))
    }
}

/// Records passing `criteria`, in input order.
pub fn filter_records<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a WineRecord>
where
    I: IntoIterator<Item = &'a WineRecord>,
{
    records
        .into_iter()
        .filter(|rec| criteria.matches(rec))
        .collect()
}
