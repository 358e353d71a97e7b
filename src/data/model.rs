use std::collections::BTreeSet;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// WineRecord – one row of a catalog file
// ---------------------------------------------------------------------------

/// A single reviewed wine. Field names follow the source column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    pub country: Option<String>,
    pub variety: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "whole_points")]
    pub points: Option<i64>,
    /// Free text; usually embeds the vintage year.
    pub title: String,
    pub province: Option<String>,
    pub region_1: Option<String>,
    pub region_2: Option<String>,
    pub taster_name: Option<String>,
    pub taster_twitter_handle: Option<String>,
    pub designation: Option<String>,
    pub winery: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Points arrive as integers or, from frames that held nulls, as whole floats
/// such as `88.0`. NaN reads as null.
fn whole_points<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(p) if p.is_nan() => Ok(None),
        Some(p) if p.fract() == 0.0 && p.abs() <= i64::MAX as f64 => Ok(Some(p as i64)),
        Some(p) => Err(D::Error::custom(format!("points must be whole, got {p}"))),
        None => Ok(None),
    }
}

impl WineRecord {
    /// Record with only the fields the filter and estimator look at.
    #[cfg(test)]
    pub fn sample(
        country: &str,
        variety: &str,
        price: Option<f64>,
        points: i64,
        title: &str,
    ) -> Self {
        WineRecord {
            country: Some(country.to_string()),
            variety: Some(variety.to_string()),
            price,
            points: Some(points),
            title: title.to_string(),
            province: None,
            region_1: None,
            region_2: None,
            taster_name: None,
            taster_twitter_handle: None,
            designation: None,
            winery: None,
            description: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog – the reference dataset
// ---------------------------------------------------------------------------

/// Inclusive numeric bounds observed in a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd> Bounds<T> {
    fn point(v: T) -> Self {
        Bounds { min: v, max: v }
    }

    fn widen(self, v: T) -> Self {
        Bounds {
            min: if v < self.min { v } else { self.min },
            max: if v > self.max { v } else { self.max },
        }
    }
}

/// The full reference dataset with pre-computed column indices.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<WineRecord>,
    countries: BTreeSet<String>,
    varieties: BTreeSet<String>,
    price_bounds: Option<Bounds<f64>>,
    points_bounds: Option<Bounds<i64>>,
}

impl Catalog {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<WineRecord>) -> Self {
        let mut countries = BTreeSet::new();
        let mut varieties = BTreeSet::new();
        let mut price_bounds: Option<Bounds<f64>> = None;
        let mut points_bounds: Option<Bounds<i64>> = None;

        for rec in &records {
            if let Some(c) = &rec.country {
                countries.insert(c.clone());
            }
            if let Some(v) = &rec.variety {
                varieties.insert(v.clone());
            }
            if let Some(p) = rec.price.filter(|p| !p.is_nan()) {
                price_bounds = Some(price_bounds.map_or(Bounds::point(p), |b| b.widen(p)));
            }
            if let Some(p) = rec.points {
                points_bounds = Some(points_bounds.map_or(Bounds::point(p), |b| b.widen(p)));
            }
        }

        Catalog {
            records,
            countries,
            varieties,
            price_bounds,
            points_bounds,
        }
    }

    pub fn records(&self) -> &[WineRecord] {
        &self.records
    }

    /// Sorted distinct non-null countries.
    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    /// Sorted distinct non-null varieties.
    pub fn varieties(&self) -> &BTreeSet<String> {
        &self.varieties
    }

    /// `None` when no record carries a price.
    pub fn price_bounds(&self) -> Option<Bounds<f64>> {
        self.price_bounds
    }

    pub fn points_bounds(&self) -> Option<Bounds<i64>> {
        self.points_bounds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ClientCatalog – bottles offered for estimation
// ---------------------------------------------------------------------------

/// Candidate bottles a user picks from. Same schema as [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct ClientCatalog {
    records: Vec<WineRecord>,
    /// Unique titles in first-seen order.
    titles: Vec<String>,
}

impl ClientCatalog {
    pub fn from_records(records: Vec<WineRecord>) -> Self {
        let titles = {
            let mut seen = BTreeSet::new();
            records
                .iter()
                .filter(|r| seen.insert(r.title.as_str()))
                .map(|r| r.title.clone())
                .collect()
        };
        ClientCatalog { records, titles }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// First record carrying `title`.
    pub fn find_by_title(&self, title: &str) -> Option<&WineRecord> {
        self.records.iter().find(|r| r.title == title)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
