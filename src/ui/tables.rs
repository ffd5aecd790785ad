use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::correlation::CorrelationMatrix;
use crate::analysis::describe::{ColumnStats, ColumnSummary, SummaryTable};

use super::charts::{format_coefficient, no_data};

const ROW_HEIGHT: f32 = 18.0;

/// Statistic rows, in pandas `describe(include="all")` order.
const STAT_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Text for one statistic of one column; blank when it does not apply.
pub fn stat_cell(column: &ColumnSummary, stat: &str) -> String {
    let num = |v: f64| format!("{v:.3}");
    match (&column.stats, stat) {
        (_, "count") => column.count.to_string(),
        (ColumnStats::Categorical(c), "unique") => c.unique.to_string(),
        (ColumnStats::Categorical(c), "top") => c.top.clone().unwrap_or_default(),
        (ColumnStats::Categorical(c), "freq") => c.freq.to_string(),
        (ColumnStats::Numeric(n), "mean") => num(n.mean),
        (ColumnStats::Numeric(n), "std") => n.std.map_or_else(|| "NaN".to_string(), num),
        (ColumnStats::Numeric(n), "min") => num(n.min),
        (ColumnStats::Numeric(n), "25%") => num(n.q25),
        (ColumnStats::Numeric(n), "50%") => num(n.median),
        (ColumnStats::Numeric(n), "75%") => num(n.q75),
        (ColumnStats::Numeric(n), "max") => num(n.max),
        _ => String::new(),
    }
}

pub fn summary_table(ui: &mut Ui, summary: &SummaryTable) {
    if summary.is_empty() {
        no_data(ui);
        return;
    }

    ui.push_id("summary_table", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto().at_least(50.0))
                .columns(Column::auto().at_least(80.0), summary.columns.len())
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    header.col(|_ui: &mut Ui| {});
                    for column in &summary.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(column.name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for stat in STAT_ROWS {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.strong(stat);
                            });
                            for column in &summary.columns {
                                row.col(|ui: &mut Ui| {
                                    ui.label(stat_cell(column, stat));
                                });
                            }
                        });
                    }
                });
        });
    });
}

pub fn correlation_table(ui: &mut Ui, corr: &CorrelationMatrix) {
    if corr.is_empty() {
        no_data(ui);
        return;
    }

    ui.push_id("correlation_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(80.0))
            .columns(Column::auto().at_least(60.0), corr.columns.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|_ui: &mut Ui| {});
                for name in &corr.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|mut body| {
                for (name, values) in corr.columns.iter().zip(&corr.values) {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.strong(name.as_str());
                        });
                        for value in values {
                            row.col(|ui: &mut Ui| {
                                ui.label(format_coefficient(*value));
                            });
                        }
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::describe::{CategoricalSummary, NumericSummary};

    #[test]
    fn cells_only_for_matching_kind() {
        let age = ColumnSummary {
            name: "AGE".into(),
            count: 1,
            stats: ColumnStats::Numeric(NumericSummary::new(&[25.0]).unwrap()),
        };
        let (count, sex) = CategoricalSummary::new(["Male"]);
        let sex = ColumnSummary {
            name: "PESEX".into(),
            count,
            stats: ColumnStats::Categorical(sex),
        };

        assert_eq!(stat_cell(&age, "count"), "1");
        assert_eq!(stat_cell(&age, "mean"), "25.000");
        assert_eq!(stat_cell(&age, "std"), "NaN");
        assert_eq!(stat_cell(&age, "top"), "");
        assert_eq!(stat_cell(&sex, "top"), "Male");
        assert_eq!(stat_cell(&sex, "freq"), "1");
        assert_eq!(stat_cell(&sex, "mean"), "");
    }
}
