use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{Attribute, FilterSelection};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };
    let table = session.table();

    // Edit a copy; the dashboard is recomputed once after all widgets ran.
    let mut selection = state.selection.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for attribute in Attribute::ALL {
                // Absent on extracts without a state column.
                let Some(column) = attribute.column(&table.schema) else {
                    continue;
                };
                multiselect(ui, attribute, table.levels(column), &mut selection);
            }

            ui.separator();
            age_range(ui, table.age_bounds(), &mut selection);
        });

    if selection != state.selection {
        state.selection = selection;
        state.refresh();
    }
}

/// Collapsible checkbox list; nothing checked means "no filter".
fn multiselect(ui: &mut Ui, attribute: Attribute, levels: &[String], selection: &mut FilterSelection) {
    let selected = selection.labels_mut(attribute);
    let header_text = if selected.is_empty() {
        format!("{}  (all)", attribute.prompt())
    } else {
        format!("{}  ({}/{})", attribute.prompt(), selected.len(), levels.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(attribute.prompt())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                selected.clear();
            }
            for label in levels {
                let mut checked = selected.contains(label);
                if ui.checkbox(&mut checked, label.as_str()).changed() {
                    FilterSelection::toggle(selected, label);
                }
            }
        });
}

fn age_range(ui: &mut Ui, bounds: Option<(f64, f64)>, selection: &mut FilterSelection) {
    ui.strong("Select Age Range:");
    let Some((min, max)) = bounds else {
        ui.label("No ages available.");
        return;
    };
    let (min, max) = (min.floor() as i64, max.ceil() as i64);
    ui.add(egui::Slider::new(&mut selection.age.lower, min..=max).text("from"));
    ui.add(egui::Slider::new(&mut selection.age.upper, min..=max).text("to"));
    if selection.age.lower > selection.age.upper {
        ui.label(RichText::new("Lower bound is above upper bound; no rows match.").color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            let visible = state.dashboard.as_ref().map_or(0, |d| d.rows);
            ui.label(format!(
                "{} rows read, {} usable, {} matching",
                session.raw_rows(),
                session.table().len(),
                visible
            ));
            if let Some(path) = session.source() {
                ui.separator();
                ui.label(path.display().to_string());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CPS extract")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
