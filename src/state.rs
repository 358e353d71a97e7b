use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::analysis::{analyze, Report};
use crate::color::ColorMap;
use crate::config::Config;
use crate::data::context::DataContext;
use crate::data::filter::{FilterCriteria, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Pages of the sidebar menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Analysis,
    Definitions,
}

/// Categorical filter dimensions shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Country,
    Variety,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub ctx: DataContext,

    pub page: Page,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Title of the selected client bottle.
    pub selected_title: Option<String>,

    /// Digest of the last recomputation.
    pub report: Report,

    /// Colours for the most represented countries.
    pub country_colors: ColorMap,

    pub histogram_bins: usize,
    pub logo: Option<PathBuf>,
    pub banner: Option<PathBuf>,
}

impl AppState {
    pub fn new(ctx: DataContext, config: &Config) -> Self {
        let criteria = FilterCriteria::for_catalog(&ctx.catalog);
        let selected_title = ctx.clients.titles().first().cloned();
        let report = Report::from_analysis(
            &analyze(&ctx, &criteria, selected_title.as_deref()),
            config.histogram_bins,
        );

        AppState {
            page: Page::default(),
            criteria,
            selected_title,
            country_colors: country_colors(&report),
            report,
            histogram_bins: config.histogram_bins,
            logo: config.logo.clone(),
            banner: config.banner.clone(),
            ctx,
        }
    }

    /// Rebuild the report after a filter or selection change.
    pub fn recompute(&mut self) {
        let analysis = analyze(&self.ctx, &self.criteria, self.selected_title.as_deref());
        let report = Report::from_analysis(&analysis, self.histogram_bins);
        log::debug!(
            "Recomputed: {} of {} wines visible",
            report.total_wines,
            self.ctx.catalog.len()
        );

        self.country_colors = country_colors(&report);
        self.report = report;
    }

    fn selection_mut(&mut self, dim: Dimension) -> &mut Selection {
        match dim {
            Dimension::Country => &mut self.criteria.countries,
            Dimension::Variety => &mut self.criteria.varieties,
        }
    }

    pub fn selection(&self, dim: Dimension) -> &Selection {
        match dim {
            Dimension::Country => &self.criteria.countries,
            Dimension::Variety => &self.criteria.varieties,
        }
    }

    /// Every value of a dimension present in the catalog.
    pub fn universe(&self, dim: Dimension) -> &BTreeSet<String> {
        match dim {
            Dimension::Country => self.ctx.catalog.countries(),
            Dimension::Variety => self.ctx.catalog.varieties(),
        }
    }

    /// Toggle a single value in a dimension's filter.
    ///
    /// Unchecking a value under `All` keeps every other value; checking the
    /// last missing value returns to `All`.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        let universe = self.universe(dim).clone();
        let selection = self.selection_mut(dim);
        if selection.is_all() {
            *selection = Selection::Only(universe.clone());
        }
        selection.toggle(value);
        if *selection == Selection::Only(universe) {
            *selection = Selection::All;
        }
        log::debug!("{dim:?} filter: {:?}", self.selection(dim));
        self.recompute();
    }

    /// Drop the restriction on a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        *self.selection_mut(dim) = Selection::All;
        self.recompute();
    }

    /// Deselect every value in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        *self.selection_mut(dim) = Selection::Only(Default::default());
        self.recompute();
    }

    /// Restore the full-catalog criteria.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::for_catalog(&self.ctx.catalog);
        self.recompute();
    }

    pub fn select_bottle(&mut self, title: &str) {
        log::debug!("Selected client bottle '{title}'");
        self.selected_title = Some(title.to_string());
        self.recompute();
    }
}

fn country_colors(report: &Report) -> ColorMap {
    ColorMap::new(
        report
            .top_country_prices
            .iter()
            .map(|(country, _)| country.as_str()),
    )
}
