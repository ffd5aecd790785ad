use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use cps_dashboard::analysis::pipeline::evaluate;
use cps_dashboard::app::DashboardApp;
use cps_dashboard::data::filter::{AgeRange, FilterSelection};
use cps_dashboard::data::loader::DEFAULT_DATA_FILE;
use cps_dashboard::data::recode::RecodedTable;
use cps_dashboard::data::session::Session;
use cps_dashboard::state::AppState;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CPS extract to open (.csv, .parquet or .json)
    #[arg(default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Print the aggregates as JSON instead of opening the dashboard
    #[arg(long)]
    summary: bool,

    /// Keep only these sex labels (repeatable)
    #[arg(long)]
    sex: Vec<String>,

    /// Keep only these income ranges (repeatable)
    #[arg(long)]
    income: Vec<String>,

    /// Keep only these marital statuses (repeatable)
    #[arg(long)]
    marital_status: Vec<String>,

    /// Keep only these states (repeatable; ignored without a state column)
    #[arg(long)]
    state: Vec<String>,

    /// Inclusive age range, defaults to 18..=65 clamped to the data
    #[arg(long, num_args = 2, value_names = ["LOWER", "UPPER"], allow_negative_numbers = true)]
    age: Option<Vec<i64>>,
}

impl Args {
    fn selection(&self, table: &RecodedTable) -> FilterSelection {
        let mut selection = FilterSelection::for_table(table);
        selection.sex.extend(self.sex.iter().cloned());
        selection.income.extend(self.income.iter().cloned());
        selection.marital_status.extend(self.marital_status.iter().cloned());
        selection.state.extend(self.state.iter().cloned());
        if let Some([lower, upper]) = self.age.as_deref() {
            selection.age = AgeRange {
                lower: *lower,
                upper: *upper,
            };
        }
        selection
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.summary {
        return print_summary(&args);
    }

    let mut state = AppState::default();
    state.open(&args.data);
    if let Some(session) = &state.session {
        state.selection = args.selection(session.table());
        state.refresh();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CPS Data Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}

fn print_summary(args: &Args) -> Result<()> {
    let session = Session::open(&args.data)?;
    let selection = args.selection(session.table());
    let dashboard = evaluate(session.table(), &selection);
    let json = serde_json::to_string_pretty(&dashboard).context("serializing dashboard")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cps_dashboard::data::model::{RawTable, Value};

    fn table() -> RecodedTable {
        let rows = vec![vec![1, 11, 7, 25, 6], vec![2, 1, 5, 70, 12]]
            .into_iter()
            .map(|r| r.into_iter().map(Value::Integer).collect())
            .collect();
        let columns = ["PESEX", "HEFAMINC", "PRMARSTA", "AGE", "ST"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        Session::from_raw(&RawTable::new(columns, rows))
            .unwrap()
            .table()
            .clone()
    }

    #[test]
    fn flags_build_the_selection() {
        let args = Args::parse_from([
            "cps-dashboard",
            "data.csv",
            "--summary",
            "--sex",
            "Male",
            "--state",
            "California",
            "--state",
            "Florida",
            "--age",
            "65",
            "18",
        ]);
        let sel = args.selection(&table());

        assert!(args.summary);
        assert_eq!(sel.sex.len(), 1);
        assert_eq!(sel.state.len(), 2);
        assert_eq!(sel.age, AgeRange { lower: 65, upper: 18 });
    }

    #[test]
    fn defaults_clamp_the_age_range() {
        let args = Args::parse_from(["cps-dashboard"]);
        assert_eq!(args.data, PathBuf::from(DEFAULT_DATA_FILE));
        let sel = args.selection(&table());
        assert_eq!(sel.age, AgeRange { lower: 25, upper: 65 });
        assert!(sel.sex.is_empty());
    }
}
