use std::path::Path;

use crate::analysis::pipeline::{Dashboard, evaluate};
use crate::data::filter::{Attribute, FilterSelection};
use crate::data::session::Session;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Recoded data for the open file (None until a file loads).
    pub session: Option<Session>,

    /// Current sidebar selection.
    pub selection: FilterSelection,

    /// Aggregates for `selection` (recomputed when it changes).
    pub dashboard: Option<Dashboard>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly recoded session, reset filters and compute the first view.
    pub fn set_session(&mut self, session: Session) {
        self.selection = FilterSelection::for_table(session.table());
        self.dashboard = Some(evaluate(session.table(), &self.selection));
        self.session = Some(session);
        self.status_message = None;
    }

    /// Load `path`, keeping the previous session if that fails.
    pub fn open(&mut self, path: &Path) {
        match Session::open(path) {
            Ok(session) => {
                log::info!(
                    "Opened {} ({} usable rows)",
                    path.display(),
                    session.table().len()
                );
                self.set_session(session);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute the dashboard if the selection changed since the last run.
    pub fn refresh(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let stale = self
            .dashboard
            .as_ref()
            .map_or(true, |d| d.selection != self.selection);
        if stale {
            self.dashboard = Some(evaluate(session.table(), &self.selection));
        }
    }

    /// Toggle a single label in an attribute's selection.
    pub fn toggle_filter_value(&mut self, attribute: Attribute, label: &str) {
        FilterSelection::toggle(self.selection.labels_mut(attribute), label);
        self.refresh();
    }

    /// Drop every selected label, i.e. stop filtering on `attribute`.
    pub fn clear_filter(&mut self, attribute: Attribute) {
        self.selection.labels_mut(attribute).clear();
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RawTable, Value};

    fn state() -> AppState {
        let rows = [[1, 11, 7, 25], [2, 1, 5, 70], [2, 11, 1, 40]]
            .iter()
            .map(|r| r.iter().map(|&v| Value::Integer(v)).collect())
            .collect();
        let columns = ["PESEX", "HEFAMINC", "PRMARSTA", "AGE"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let mut state = AppState::default();
        state.set_session(Session::from_raw(&RawTable::new(columns, rows)).unwrap());
        state
    }

    #[test]
    fn loading_computes_the_default_view() {
        let state = state();
        let dashboard = state.dashboard.as_ref().unwrap();
        // default age range is 25..=65, so the 70-year-old is out
        assert_eq!(dashboard.rows, 2);
    }

    #[test]
    fn toggling_recomputes() {
        let mut state = state();
        state.toggle_filter_value(Attribute::Sex, "Female");
        assert_eq!(state.dashboard.as_ref().unwrap().rows, 1);

        state.clear_filter(Attribute::Sex);
        assert_eq!(state.dashboard.as_ref().unwrap().rows, 2);
    }

    #[test]
    fn failed_open_keeps_the_session() {
        let mut state = state();
        state.open(Path::new("/nonexistent/survey.csv"));
        assert!(state.session.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
