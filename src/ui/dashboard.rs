use eframe::egui::{ScrollArea, Ui};

use crate::state::AppState;

use super::charts::{self, section};
use super::tables;

// ---------------------------------------------------------------------------
// Central panel – statistics and charts
// ---------------------------------------------------------------------------

/// Render every dashboard section for the current selection.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CPS extract to explore it  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("CPS Data Analysis Dashboard");
            if dashboard.is_empty() {
                ui.label("No rows match the current filters.");
            }

            section(ui, "Summary Statistics");
            tables::summary_table(ui, &dashboard.summary);

            section(ui, "Age Distribution");
            charts::age_histogram(ui, &dashboard.age_histogram);

            for chart in &dashboard.charts {
                section(ui, &chart.title);
                charts::grouped_counts(ui, chart);
            }

            section(ui, "Correlation Matrix");
            tables::correlation_table(ui, &dashboard.correlation);

            section(ui, "Correlation Heatmap");
            charts::correlation_heatmap(ui, &dashboard.correlation);
        });
}
