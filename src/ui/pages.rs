use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::{BottleReport, GroupReport, Report, TOP_COUNTRIES, TOP_VARIETIES};
use crate::color::red_scale;
use crate::data::schema::{self, ColumnKind};
use crate::estimate::Reduction;
use crate::state::AppState;
use crate::stats::Histogram;
use crate::ui::plot;

const WARNING: Color32 = Color32::from_rgb(200, 120, 0);
const BAR_FILL: Color32 = Color32::from_rgb(99, 110, 250);

fn warn(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(text.into()).color(WARNING));
}

fn money(v: Option<f64>) -> String {
    v.map(|p| format!("{p:.2} €"))
        .unwrap_or_else(|| "no data".to_string())
}

fn number(v: Option<f64>) -> String {
    v.map(|p| format!("{p:.2}"))
        .unwrap_or_else(|| "no data".to_string())
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

pub fn home(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("Welcome to the Domaine des Croix").size(28.0));
    });
    ui.add_space(8.0);
    ui.label(
        "Welcome to the Domaine des Croix, a sanctuary for wine lovers. We are dedicated to \
         producing exceptional wines from carefully selected grape varieties, grown with passion \
         on sun-drenched hillsides.",
    );
    ui.add_space(8.0);
    ui.label("Open the Analysis page to explore the catalog and price a bottle.");

    if let Some(path) = &state.banner {
        ui.add_space(12.0);
        ui.add(
            egui::Image::new(format!("file://{}", path.display()))
                .max_width(ui.available_width())
                .corner_radius(4.0),
        );
        ui.vertical_centered(|ui: &mut Ui| {
            ui.small("Vineyard of the Domaine des Croix");
        });
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

pub fn definitions(ui: &mut Ui) {
    ui.heading("Column definitions");
    ui.add_space(8.0);
    egui::Grid::new("definitions")
        .striped(true)
        .num_columns(3)
        .spacing([24.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            for col in schema::COLUMNS {
                let kind = match col.kind {
                    ColumnKind::Text => "text",
                    ColumnKind::Float => "decimal",
                    ColumnKind::Integer => "integer",
                };
                ui.strong(col.name);
                ui.label(RichText::new(kind).weak());
                ui.label(col.description);
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

pub fn analysis(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Wine analysis and price estimation");
            ui.add_space(8.0);

            let report = &state.report;
            ui.columns(2, |cols| {
                cols[0].strong("General metrics");
                metrics_table(&mut cols[0], report);

                cols[1].strong(format!("Varieties (top {TOP_VARIETIES})"));
                plot::category_bars(
                    &mut cols[1],
                    "top_varieties",
                    &report.top_varieties,
                    "Number of wines",
                    |_| BAR_FILL,
                );
            });

            ui.separator();
            ui.strong("Wines per country");
            let max = report.country_counts.first().map_or(1, |(_, n)| *n);
            plot::category_bars(
                ui,
                "country_counts",
                &report.country_counts,
                "Number of wines",
                |n| red_scale(n as f32 / max as f32),
            );

            ui.separator();
            ui.strong(format!("Price distribution by country (top {TOP_COUNTRIES})"));
            if report.top_country_prices.is_empty() {
                warn(ui, "No priced wine matches the filters.");
            } else {
                let series: Vec<(&str, &Histogram, Color32)> = report
                    .top_country_prices
                    .iter()
                    .map(|(c, h)| (c.as_str(), h, state.country_colors.color_for(c)))
                    .collect();
                plot::histogram(ui, "top_country_prices", &series, None);
            }

            ui.separator();
            ui.strong("Variety word cloud");
            if report.variety_cloud.is_empty() {
                warn(ui, "No variety to show, adjust the filters.");
            } else {
                plot::word_cloud(ui, &report.variety_cloud);
            }

            ui.separator();
            estimation(ui, state);
        });
}

fn metrics_table(ui: &mut Ui, report: &Report) {
    let price = report.price.summary;
    let points = report.points.summary;
    let rows: [(&str, String); 10] = [
        ("Total number of wines", report.total_wines.to_string()),
        ("Average price", money(price.map(|s| s.mean))),
        ("Median price", money(price.map(|s| s.median))),
        ("Minimum price", money(price.map(|s| s.min))),
        ("Maximum price", money(price.map(|s| s.max))),
        ("Countries represented", report.countries_represented.to_string()),
        ("Average points", number(points.map(|s| s.mean))),
        ("Median points", number(points.map(|s| s.median))),
        ("Minimum points", number(points.map(|s| s.min))),
        ("Maximum points", number(points.map(|s| s.max))),
    ];

    egui::Grid::new("metrics")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for (name, value) in rows {
                ui.label(name);
                ui.label(value);
                ui.end_row();
            }
        });
}

fn estimation(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Estimate the price of a bottle");
    if state.ctx.clients.is_empty() {
        warn(ui, "The client catalog holds no bottle.");
        return;
    }

    // ---- Client bottle selector ----
    let current = state.selected_title.clone().unwrap_or_default();
    let mut chosen: Option<String> = None;
    egui::ComboBox::from_id_salt("client_bottle")
        .selected_text(&current)
        .width(ui.available_width().min(500.0))
        .show_ui(ui, |ui: &mut Ui| {
            for title in state.ctx.clients.titles() {
                if ui.selectable_label(current == *title, title).clicked() {
                    chosen = Some(title.clone());
                }
            }
        });
    if let Some(title) = chosen {
        state.select_bottle(&title);
    }

    let Some(bottle) = &state.report.bottle else {
        warn(ui, "No bottle selected.");
        return;
    };

    egui::CollapsingHeader::new("Selected bottle")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let json = serde_json::to_string_pretty(&bottle.record);
            match json {
                Ok(json) => {
                    ui.code(json);
                }
                Err(e) => warn(ui, format!("Cannot display the bottle: {e}")),
            }
        });

    // ---- Similar-match estimate ----
    let marker = bottle.estimated_price;
    match marker {
        Some(price) => {
            let headline = format!("Estimated price: {price:.2} €");
            ui.label(RichText::new(headline).size(22.0).strong());
            group_histogram(
                ui,
                "similar",
                "Price distribution of similar wines",
                &bottle.similar,
                marker,
            );
        }
        None => warn(ui, "Not enough data to estimate the price."),
    }

    ui.separator();
    ui.strong("Price comparison with similar bottles");
    comparisons(ui, bottle, marker);
}

fn comparisons(ui: &mut Ui, bottle: &BottleReport, marker: Option<f64>) {
    match &bottle.vintage {
        Some((year, group)) => match group.estimate {
            Some(avg) => {
                ui.label(format!("Average price of {year} wines: {avg:.2} €"));
                let title = format!("Price distribution of {year} wines");
                group_histogram(ui, "vintage", &title, group, marker);
            }
            None => warn(ui, format!("No wine found for the year {year}.")),
        },
        None => warn(ui, "No year found in the title of the selected bottle."),
    }

    let country = bottle.record.country.as_deref().unwrap_or("unknown");
    match bottle.country.estimate {
        Some(avg) => {
            ui.label(format!("Average price of wines from {country}: {avg:.2} €"));
            let title = format!("Price distribution of wines from {country}");
            group_histogram(ui, "country", &title, &bottle.country, marker);
        }
        None => warn(ui, format!("No wine found for the country {country}.")),
    }

    let variety = bottle.record.variety.as_deref().unwrap_or("unknown");
    match bottle.variety.estimate {
        Some(avg) => {
            ui.label(format!("Average price of {variety} wines: {avg:.2} €"));
            let title = format!("Price distribution of {variety} wines");
            group_histogram(ui, "variety", &title, &bottle.variety, marker);
        }
        None => warn(ui, format!("No wine found for the variety {variety}.")),
    }
}

fn group_histogram(
    ui: &mut Ui,
    id: &str,
    title: &str,
    group: &GroupReport,
    marker: Option<f64>,
) {
    let Some(hist) = &group.histogram else {
        return;
    };
    let reduction = match group.reduction {
        Reduction::Mean => "mean",
        Reduction::Median => "median",
    };
    ui.small(format!(
        "{title} ({} wines, {} priced, {reduction} shown)",
        group.count,
        hist.total()
    ));
    plot::histogram(ui, id, &[("price", hist, BAR_FILL)], marker);
}
