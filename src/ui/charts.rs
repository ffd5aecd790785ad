use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, FontId, Rect, RichText, Sense, Ui, vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::analysis::correlation::CorrelationMatrix;
use crate::analysis::frequency::GroupedFrequency;
use crate::analysis::histogram::Histogram;
use crate::color::{self, ColorMap};

const PLOT_HEIGHT: f32 = 280.0;
/// Share of a category slot covered by its bars.
const GROUP_WIDTH: f64 = 0.8;

/// Placeholder drawn instead of a chart when the view is empty.
pub fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data for the current filters.").italics());
}

// ---------------------------------------------------------------------------
// Age histogram
// ---------------------------------------------------------------------------

pub fn age_histogram(ui: &mut Ui, histogram: &Histogram) {
    if histogram.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|b| Bar::new((b.start + b.end) / 2.0, b.count as f64).width(b.end - b.start))
        .collect();

    Plot::new("age_histogram")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Age")
        .y_axis_label("Frequency")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Age").color(Color32::LIGHT_BLUE));
            if !histogram.density.is_empty() {
                let points: PlotPoints = histogram.density.iter().copied().collect();
                plot_ui.line(Line::new(points).name("Density").width(2.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped count plots
// ---------------------------------------------------------------------------

/// Draw a count plot, one panel per facet level.
pub fn grouped_counts(ui: &mut Ui, freq: &GroupedFrequency) {
    if freq.is_empty() {
        no_data(ui);
        return;
    }

    let colors = ColorMap::new(&freq.hue_levels);

    if freq.facet_levels.is_empty() {
        count_panel(ui, freq, None, &colors);
        return;
    }

    ui.columns(freq.facet_levels.len(), |columns: &mut [Ui]| {
        for (ui, facet) in columns.iter_mut().zip(&freq.facet_levels) {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.strong(facet_heading(freq, facet));
            });
            count_panel(ui, freq, Some(facet.as_str()), &colors);
        }
    });
}

/// Panel heading in `dimension = level` form.
pub fn facet_heading(freq: &GroupedFrequency, level: &str) -> String {
    match &freq.facet_name {
        Some(name) => format!("{name} = {level}"),
        None => level.to_string(),
    }
}

fn count_panel(ui: &mut Ui, freq: &GroupedFrequency, facet: Option<&str>, colors: &ColorMap) {
    let labels = freq.x_levels.clone();
    let id = format!("{}::{}", freq.title, facet.unwrap_or_default());

    // Single unnamed series when the chart has no hue.
    let series: Vec<Option<&str>> = if freq.hue_levels.is_empty() {
        vec![None]
    } else {
        freq.hue_levels.iter().map(|h| Some(h.as_str())).collect()
    };
    let bar_width = GROUP_WIDTH / series.len() as f64;

    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(j, hue)| {
            let offset = (j as f64 - (series.len() - 1) as f64 / 2.0) * bar_width;
            let bars = freq
                .x_levels
                .iter()
                .enumerate()
                .map(|(i, x)| {
                    Bar::new(i as f64 + offset, freq.count(facet, x, *hue) as f64)
                        .width(bar_width)
                        .name(x)
                })
                .collect();
            let chart = BarChart::new(bars);
            match hue {
                Some(h) => chart.name(*h).color(colors.color_for(h)),
                None => chart.name(&freq.y_label).color(Color32::LIGHT_BLUE),
            }
        })
        .collect();

    let mut plot = Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(freq.x_label.clone())
        .y_axis_label(freq.y_label.clone())
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        });
    if !freq.hue_levels.is_empty() {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// Category name for an axis mark sitting on a category slot.
fn category_label(labels: &[String], value: f64) -> String {
    let slot = value.round();
    if (value - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

const CELL: f32 = 56.0;
const LABEL_MARGIN: f32 = 110.0;

pub fn correlation_heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    if corr.is_empty() {
        no_data(ui);
        return;
    }

    let n = corr.columns.len() as f32;
    let size = vec2(LABEL_MARGIN + CELL * n, LABEL_MARGIN + CELL * n);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    for (i, row) in corr.values.iter().enumerate() {
        let y = CELL * i as f32;
        for (j, value) in row.iter().enumerate() {
            let rect = Rect::from_min_size(
                origin + vec2(LABEL_MARGIN + CELL * j as f32, y),
                vec2(CELL, CELL),
            );
            painter.rect_filled(rect.shrink(1.0), 0.0, color::coolwarm(*value));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                format_coefficient(*value),
                font.clone(),
                color::text_on_coolwarm(*value),
            );
        }
        painter.text(
            origin + vec2(LABEL_MARGIN - 6.0, y + CELL / 2.0),
            Align2::RIGHT_CENTER,
            &corr.columns[i],
            font.clone(),
            text_color,
        );
    }

    for (j, name) in corr.columns.iter().enumerate() {
        painter.text(
            origin + vec2(LABEL_MARGIN + CELL * (j as f32 + 0.5), CELL * n + 6.0),
            Align2::CENTER_TOP,
            name,
            font.clone(),
            text_color,
        );
    }

    response.on_hover_text("Pearson correlation; grey cells are undefined");
}

pub fn format_coefficient(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{v:.2}"))
}

/// Separator-and-heading helper shared by the dashboard sections.
pub fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_category_slots() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 0.0), "a");
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn facet_heading_names_the_split_dimension() {
        let mut freq = GroupedFrequency {
            title: "Income Distribution by Gender and Age Group".into(),
            x_label: "Income Range".into(),
            y_label: "Frequency".into(),
            legend_title: Some("Gender".into()),
            x_levels: Vec::new(),
            hue_levels: Vec::new(),
            facet_name: Some("age_group".into()),
            facet_levels: vec!["18-29".into()],
            counts: Vec::new(),
        };
        assert_eq!(facet_heading(&freq, "18-29"), "age_group = 18-29");

        freq.facet_name = Some("PRMARSTA".into());
        assert_eq!(facet_heading(&freq, "Widowed"), "PRMARSTA = Widowed");
    }

    #[test]
    fn coefficients_print_with_two_decimals() {
        assert_eq!(format_coefficient(Some(0.12345)), "0.12");
        assert_eq!(format_coefficient(None), "NaN");
    }
}
