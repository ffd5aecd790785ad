use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::data::recode::{Schema, StateColumn};

use super::age_group::AgeGroup;
use super::view::{FilteredView, ViewRow};

// ---------------------------------------------------------------------------
// Dimensions and chart layouts
// ---------------------------------------------------------------------------

/// A categorical axis: a schema column or the derived age group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Column(usize),
    AgeGroup,
}

impl Dimension {
    pub fn name(self, schema: &Schema) -> String {
        match self {
            Dimension::Column(i) => schema.column(i).name.clone(),
            Dimension::AgeGroup => AgeGroup::COLUMN.to_string(),
        }
    }

    /// The row's category on this axis, `None` when it has none.
    pub fn value<'a>(self, row: &ViewRow<'a>) -> Option<&'a str> {
        match self {
            Dimension::Column(i) => row.record.label(i),
            Dimension::AgeGroup => row.age_group.map(AgeGroup::label),
        }
    }

    /// Categories present in the view, in display order.
    ///
    /// Recoded columns follow code order; the age group always lists all
    /// four bins; other columns follow first appearance.
    pub fn levels(self, view: &FilteredView<'_>) -> Vec<String> {
        if self == Dimension::AgeGroup {
            return AgeGroup::labels().map(str::to_string).collect();
        }
        let mut levels: Vec<String> = Vec::new();
        for label in view.rows().iter().filter_map(|row| self.value(row)) {
            if !levels.iter().any(|l| l == label) {
                levels.push(label.to_string());
            }
        }
        if let Dimension::Column(i) = self {
            if let Some(table) = view.schema().column(i).lookup() {
                levels.sort_by_key(|l| table.rank(l));
            }
        }
        levels
    }
}

/// One grouped count plot: rows counted per `x` category, split by `hue`
/// and optionally faceted into panels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub x: Dimension,
    pub x_label: &'static str,
    pub hue: Option<Dimension>,
    pub legend_title: Option<&'static str>,
    /// Fixed hue order; rows with other hue values are left out.
    pub hue_order: Option<&'static [&'static str]>,
    pub facet: Option<Dimension>,
}

impl ChartSpec {
    fn count(title: &'static str, x: Dimension, x_label: &'static str) -> Self {
        Self {
            title,
            x,
            x_label,
            hue: None,
            legend_title: None,
            hue_order: None,
            facet: None,
        }
    }

    fn by(mut self, hue: Dimension, legend_title: &'static str) -> Self {
        self.hue = Some(hue);
        self.legend_title = Some(legend_title);
        self
    }

    fn hue_order(mut self, order: &'static [&'static str]) -> Self {
        self.hue_order = Some(order);
        self
    }

    fn facet(mut self, facet: Dimension) -> Self {
        self.facet = Some(facet);
        self
    }
}

/// Every count chart on the dashboard, in display order.
pub fn dashboard_charts(schema: &Schema) -> Vec<ChartSpec> {
    let sex = Dimension::Column(schema.sex());
    let income = Dimension::Column(schema.income());
    let marital = Dimension::Column(schema.marital_status());

    let mut charts = vec![
        ChartSpec::count("Income Distribution", income, "Income Range"),
        ChartSpec::count("Income Distribution by Age Group", income, "Income Range")
            .by(Dimension::AgeGroup, "Age Group"),
        ChartSpec::count(
            "Marital Status Distribution by Income Range",
            marital,
            "Marital Status",
        )
        .by(income, "Income Range"),
    ];
    if let Some(state) = schema.state() {
        charts.push(gender_by_state(schema, state));
    }
    charts.push(
        ChartSpec::count(
            "Income Distribution by Gender and Age Group",
            income,
            "Income Range",
        )
        .by(sex, "Gender")
        .hue_order(&["Male", "Female"])
        .facet(Dimension::AgeGroup),
    );
    if let Some(state) = schema.state() {
        charts.push(income_by_state(schema, state));
    }
    charts
}

pub fn gender_by_state(schema: &Schema, state: StateColumn) -> ChartSpec {
    ChartSpec::count(
        "Gender Distribution by State",
        Dimension::Column(state.index()),
        "State",
    )
    .by(Dimension::Column(schema.sex()), "Gender")
}

pub fn income_by_state(schema: &Schema, state: StateColumn) -> ChartSpec {
    ChartSpec::count(
        "Income Distribution by State",
        Dimension::Column(state.index()),
        "State",
    )
    .by(Dimension::Column(schema.income()), "Income Range")
}

// ---------------------------------------------------------------------------
// Grouped frequency tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyCount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    pub x: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<String>,
    pub count: u64,
}

/// Counts for one chart. Only non-zero combinations are listed in `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedFrequency {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: Option<String>,
    pub x_levels: Vec<String>,
    pub hue_levels: Vec<String>,
    /// Name of the facet dimension, when the chart is split into panels.
    pub facet_name: Option<String>,
    pub facet_levels: Vec<String>,
    pub counts: Vec<FrequencyCount>,
}

impl GroupedFrequency {
    pub fn count(&self, facet: Option<&str>, x: &str, hue: Option<&str>) -> u64 {
        self.counts
            .iter()
            .find(|c| c.facet.as_deref() == facet && c.x == x && c.hue.as_deref() == hue)
            .map_or(0, |c| c.count)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count rows per (facet, x, hue) combination.
///
/// Rows without a category on any used dimension are not counted.
pub fn grouped_frequency(view: &FilteredView<'_>, spec: &ChartSpec) -> GroupedFrequency {
    let x_levels = spec.x.levels(view);
    let hue_levels: Vec<String> = match (spec.hue, spec.hue_order) {
        (Some(_), Some(order)) => order.iter().map(|s| s.to_string()).collect(),
        (Some(hue), None) => hue.levels(view),
        (None, _) => Vec::new(),
    };
    let facet_levels = spec.facet.map(|f| f.levels(view)).unwrap_or_default();

    let x_pos = positions(&x_levels);
    let hue_pos = positions(&hue_levels);
    let facet_pos = positions(&facet_levels);

    let mut tally: BTreeMap<(usize, usize, usize), u64> = BTreeMap::new();
    for row in view.rows() {
        let Some(x) = spec.x.value(row).and_then(|v| x_pos.get(v).copied()) else {
            continue;
        };
        let hue = match spec.hue {
            Some(dim) => match dim.value(row).and_then(|v| hue_pos.get(v).copied()) {
                Some(h) => h,
                None => continue,
            },
            None => 0,
        };
        let facet = match spec.facet {
            Some(dim) => match dim.value(row).and_then(|v| facet_pos.get(v).copied()) {
                Some(f) => f,
                None => continue,
            },
            None => 0,
        };
        *tally.entry((facet, x, hue)).or_default() += 1;
    }

    let counts = tally
        .into_iter()
        .map(|((f, x, h), count)| FrequencyCount {
            facet: spec.facet.map(|_| facet_levels[f].clone()),
            x: x_levels[x].clone(),
            hue: spec.hue.map(|_| hue_levels[h].clone()),
            count,
        })
        .collect();

    GroupedFrequency {
        title: spec.title.to_string(),
        x_label: spec.x_label.to_string(),
        y_label: "Frequency".to_string(),
        legend_title: spec.legend_title.map(str::to_string),
        x_levels,
        hue_levels,
        facet_name: spec.facet.map(|f| f.name(view.schema())),
        facet_levels,
        counts,
    }
}

fn positions(levels: &[String]) -> HashMap<&str, usize> {
    levels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{AgeRange, FilterSelection};
    use crate::data::model::{RawTable, Value};
    use crate::data::recode::{RecodedTable, recode};

    fn table(columns: &[&str], rows: &[&[i64]]) -> RecodedTable {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|&v| Value::Integer(v)).collect())
            .collect();
        let columns = columns.iter().map(|c| c.to_string()).collect();
        recode(&RawTable::new(columns, rows)).unwrap()
    }

    fn everything() -> FilterSelection {
        FilterSelection {
            age: AgeRange { lower: 0, upper: 200 },
            ..FilterSelection::default()
        }
    }

    #[test]
    fn state_charts_need_a_state_column() {
        let with = table(&["PESEX", "HEFAMINC", "PRMARSTA", "AGE", "ST"], &[&[1, 11, 7, 25, 6]]);
        let without = table(&["PESEX", "HEFAMINC", "PRMARSTA", "AGE"], &[&[1, 11, 7, 25]]);

        let titles = |t: &RecodedTable| -> Vec<&'static str> {
            dashboard_charts(&t.schema).iter().map(|c| c.title).collect()
        };
        assert_eq!(titles(&with).len(), 6);
        assert!(titles(&with).contains(&"Income Distribution by State"));
        assert_eq!(
            titles(&without),
            vec![
                "Income Distribution",
                "Income Distribution by Age Group",
                "Marital Status Distribution by Income Range",
                "Income Distribution by Gender and Age Group",
            ]
        );
    }

    #[test]
    fn one_dimensional_counts() {
        let t = table(
            &["PESEX", "HEFAMINC", "PRMARSTA", "AGE"],
            &[&[1, 11, 7, 25], &[2, 11, 5, 70], &[2, 1, 1, 40]],
        );
        let view = FilteredView::new(&t, &everything());
        let spec = ChartSpec::count("Income", Dimension::Column(1), "Income Range");
        let freq = grouped_frequency(&view, &spec);

        assert_eq!(freq.x_levels, vec!["Less Than $5,000", "40,000 To 49,999"]);
        assert_eq!(freq.count(None, "40,000 To 49,999", None), 2);
        assert_eq!(freq.count(None, "Less Than $5,000", None), 1);
        assert_eq!(freq.total(), 3);
    }

    #[test]
    fn hue_by_age_group_skips_unbucketed_rows() {
        let t = table(
            &["PESEX", "HEFAMINC", "PRMARSTA", "AGE"],
            &[&[1, 11, 7, 25], &[2, 11, 5, 29], &[2, 11, 1, 30], &[1, 11, 1, 16]],
        );
        let view = FilteredView::new(&t, &everything());
        let spec = ChartSpec::count("Income by age", Dimension::Column(1), "Income Range")
            .by(Dimension::AgeGroup, "Age Group");
        let freq = grouped_frequency(&view, &spec);

        assert_eq!(freq.hue_levels, vec!["18-29", "30-44", "45-59", "60+"]);
        assert_eq!(freq.count(None, "40,000 To 49,999", Some("18-29")), 2);
        assert_eq!(freq.count(None, "40,000 To 49,999", Some("30-44")), 1);
        assert_eq!(freq.total(), 3);
    }

    #[test]
    fn faceted_counts_use_fixed_hue_order() {
        let t = table(
            &["PESEX", "HEFAMINC", "PRMARSTA", "AGE"],
            &[&[2, 11, 7, 25], &[1, 11, 5, 26], &[1, 11, 1, 61]],
        );
        let view = FilteredView::new(&t, &everything());
        let spec = dashboard_charts(&t.schema)
            .into_iter()
            .find(|c| c.facet.is_some())
            .unwrap();
        let freq = grouped_frequency(&view, &spec);

        assert_eq!(freq.hue_levels, vec!["Male", "Female"]);
        assert_eq!(freq.facet_name.as_deref(), Some("age_group"));
        assert_eq!(freq.facet_levels.len(), 4);
        assert_eq!(freq.count(Some("18-29"), "40,000 To 49,999", Some("Male")), 1);
        assert_eq!(freq.count(Some("18-29"), "40,000 To 49,999", Some("Female")), 1);
        assert_eq!(freq.count(Some("60+"), "40,000 To 49,999", Some("Male")), 1);
        assert_eq!(freq.count(Some("30-44"), "40,000 To 49,999", Some("Male")), 0);
    }

    #[test]
    fn empty_view_has_no_counts() {
        let t = table(&["PESEX", "HEFAMINC", "PRMARSTA", "AGE"], &[&[2, 11, 7, 25]]);
        let none = FilterSelection {
            age: AgeRange { lower: 200, upper: 201 },
            ..FilterSelection::default()
        };
        let view = FilteredView::new(&t, &none);
        for spec in dashboard_charts(&t.schema) {
            let freq = grouped_frequency(&view, &spec);
            assert!(freq.is_empty());
            assert_eq!(freq.total(), 0);
        }
    }
}
