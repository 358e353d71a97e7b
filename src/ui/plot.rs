use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, LineStyle, Plot, VLine};

use crate::color::generate_palette;
use crate::stats::Histogram;

// ---------------------------------------------------------------------------
// Category bar chart
// ---------------------------------------------------------------------------

/// Vertical bars, one per category, labelled on the x axis.
pub fn category_bars(
    ui: &mut Ui,
    id: &str,
    counts: &[(String, usize)],
    y_label: &str,
    fill: impl Fn(usize) -> Color32,
) {
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, n))| {
            Bar::new(i as f64, *n as f64)
                .name(label)
                .width(0.7)
                .fill(fill(*n))
        })
        .collect();
    let labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();

    Plot::new(id)
        .height(280.0)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Price histograms
// ---------------------------------------------------------------------------

/// Stacked histograms sharing bins, with an optional estimated-price marker.
pub fn histogram(
    ui: &mut Ui,
    id: &str,
    series: &[(&str, &Histogram, Color32)],
    marker: Option<f64>,
) {
    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());
    for (name, hist, color) in series {
        let bars: Vec<Bar> = hist
            .bins
            .iter()
            .map(|b| {
                Bar::new(b.center(), b.count as f64)
                    .width(b.width())
                    .name(format!("{:.0} – {:.0}", b.start, b.end))
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(*name)
            .color(*color)
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new(id)
        .height(260.0)
        .legend(Legend::default())
        .x_axis_label("Price (€)")
        .y_axis_label("Number of wines")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            if let Some(x) = marker {
                plot_ui.vline(
                    VLine::new(x)
                        .name("Estimated price")
                        .color(Color32::RED)
                        .style(LineStyle::dashed_loose()),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Word cloud
// ---------------------------------------------------------------------------

/// Labels sized by frequency, most frequent first.
pub fn word_cloud(ui: &mut Ui, words: &[(String, usize)]) {
    let Some(max) = words.iter().map(|(_, n)| *n).max() else {
        return;
    };
    let palette = generate_palette(words.len().min(12));

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, (word, n)) in words.iter().enumerate() {
            let weight = (*n as f32 / max as f32).sqrt();
            ui.label(
                RichText::new(word)
                    .size(11.0 + 33.0 * weight)
                    .color(palette[i % palette.len()]),
            )
            .on_hover_text(format!("{n} wines"));
        }
    });
}
