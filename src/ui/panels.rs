use eframe::egui::{self, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::Selection;
use crate::state::{AppState, Dimension, Page};

// ---------------------------------------------------------------------------
// Left side panel – menu and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: logo, page menu and, on the analysis page, filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    if let Some(path) = &state.logo {
        let logo = format!("file://{}", path.display());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(logo)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(100.0)
                    .corner_radius(4.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Menu");
    for (page, label) in [
        (Page::Home, "Home"),
        (Page::Analysis, "Analysis"),
        (Page::Definitions, "Definitions"),
    ] {
        ui.radio_value(&mut state.page, page, label);
    }
    ui.separator();

    if state.page != Page::Analysis {
        return;
    }

    ui.heading("Filters");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            category_filter(ui, state, Dimension::Country, "Countries");
            category_filter(ui, state, Dimension::Variety, "Varieties");
            ui.separator();
            price_filter(ui, state);
            points_filter(ui, state);
            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// Collapsible checklist for one categorical dimension.
fn category_filter(ui: &mut Ui, state: &mut AppState, dim: Dimension, title: &str) {
    // Clone what we need so we can mutate state inside the loop.
    let values: Vec<String> = state.universe(dim).iter().cloned().collect();

    // Show count of selected / total in the header
    let n_total = values.len();
    let n_selected = match state.selection(dim) {
        Selection::All => n_total,
        Selection::Only(set) => set.len(),
    };
    let header_text = format!("{title}  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            // Select all / none buttons
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dim);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dim);
                }
            });

            for val in &values {
                let mut checked = state.selection(dim).contains(val);
                if ui.checkbox(&mut checked, val.as_str()).changed() {
                    state.toggle_filter_value(dim, val);
                }
            }
        });
}

fn price_filter(ui: &mut Ui, state: &mut AppState) {
    let Some(bounds) = state.ctx.catalog.price_bounds() else {
        return;
    };
    let full = bounds.min.floor()..=bounds.max.ceil();
    let mut lo = *state.criteria.price.start();
    let mut hi = *state.criteria.price.end();

    ui.strong("Price range");
    let min = Slider::new(&mut lo, full.clone()).step_by(1.0);
    let max = Slider::new(&mut hi, full).step_by(1.0);
    let changed = ui.add(min.text("min")).changed() | ui.add(max.text("max")).changed();
    if changed {
        state.criteria.price = lo.min(hi)..=hi.max(lo);
        state.recompute();
    }
}

fn points_filter(ui: &mut Ui, state: &mut AppState) {
    let Some(bounds) = state.ctx.catalog.points_bounds() else {
        return;
    };
    let mut lo = *state.criteria.points.start();
    let mut hi = *state.criteria.points.end();

    ui.strong("Points range");
    let range = bounds.min..=bounds.max;
    let min = Slider::new(&mut lo, range.clone());
    let max = Slider::new(&mut hi, range);
    let changed = ui.add(min.text("min")).changed() | ui.add(max.text("max")).changed();
    if changed {
        state.criteria.points = lo.min(hi)..=hi.max(lo);
        state.recompute();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(format!(
            "{} wines loaded, {} visible",
            state.ctx.catalog.len(),
            state.report.total_wines
        ));
        ui.separator();
        ui.label(format!("{} client bottles", state.ctx.clients.len()));
    });
}
