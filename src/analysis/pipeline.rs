use serde::Serialize;

use crate::data::filter::FilterSelection;
use crate::data::recode::RecodedTable;

use super::correlation::{CorrelationMatrix, correlation};
use super::describe::{SummaryTable, describe};
use super::frequency::{GroupedFrequency, dashboard_charts, grouped_frequency};
use super::histogram::{Histogram, age_histogram};
use super::view::FilteredView;

/// Everything the rendering layer needs for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Rows in the filtered view.
    pub rows: usize,
    pub selection: FilterSelection,
    pub summary: SummaryTable,
    pub age_histogram: Histogram,
    pub charts: Vec<GroupedFrequency>,
    pub correlation: CorrelationMatrix,
}

impl Dashboard {
    /// Whether the selection matched no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn chart(&self, title: &str) -> Option<&GroupedFrequency> {
        self.charts.iter().find(|c| c.title == title)
    }
}

/// Filter the table and compute every aggregate.
///
/// Pure: the same table and selection always give the same dashboard. An
/// empty view yields empty aggregates rather than an error.
pub fn evaluate(table: &RecodedTable, selection: &FilterSelection) -> Dashboard {
    let view = FilteredView::new(table, selection);
    log::debug!(
        "Selection {selection:?} kept {} of {} rows",
        view.len(),
        table.len()
    );

    let charts = dashboard_charts(&table.schema)
        .iter()
        .map(|spec| grouped_frequency(&view, spec))
        .collect();

    Dashboard {
        rows: view.len(),
        selection: selection.clone(),
        summary: describe(&view),
        age_histogram: age_histogram(&view),
        charts,
        correlation: correlation(&view),
    }
}
