use serde::Serialize;

use crate::data::recode::ColumnKind;

use super::age_group::AgeGroup;
use super::view::FilteredView;

/// "Describe all columns" over a filtered view.
///
/// Empty for an empty view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Non-missing values in the column.
    pub count: usize,
    pub stats: ColumnStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Numeric summary with pandas conventions: sample standard deviation and
/// linearly interpolated quartiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: f64,
    /// Undefined for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// `None` if `values` is empty.
    pub fn new(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        Some(Self {
            mean,
            std: sample_std(&sorted, mean),
            min,
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub unique: usize,
    /// Most frequent label; ties go to the label seen first.
    pub top: Option<String>,
    pub freq: usize,
}

impl CategoricalSummary {
    pub fn new<'s, I>(labels: I) -> (usize, Self)
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut total = 0;
        for label in labels {
            total += 1;
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label, 1)),
            }
        }
        // First maximum wins, so ties keep first-appearance order.
        let top = counts
            .iter()
            .fold(None::<(&str, usize)>, |best, &(l, n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((l, n)),
            });
        let summary = Self {
            unique: counts.len(),
            top: top.map(|(l, _)| l.to_string()),
            freq: top.map_or(0, |(_, n)| n),
        };
        (total, summary)
    }
}

/// Summarise every column of the view plus the derived age group.
pub fn describe(view: &FilteredView<'_>) -> SummaryTable {
    if view.is_empty() {
        return SummaryTable::default();
    }

    let mut columns: Vec<ColumnSummary> = view
        .schema()
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(i, meta)| {
            let (count, stats) = match meta.kind {
                ColumnKind::Numeric => {
                    let values = view.numbers(i);
                    let summary = NumericSummary::new(&values)?;
                    (values.len(), ColumnStats::Numeric(summary))
                }
                ColumnKind::Categorical => {
                    let (count, summary) =
                        CategoricalSummary::new(view.records().filter_map(|r| r.label(i)));
                    (count, ColumnStats::Categorical(summary))
                }
            };
            Some(ColumnSummary {
                name: meta.name.clone(),
                count,
                stats,
            })
        })
        .collect();

    let (count, groups) = CategoricalSummary::new(
        view.rows()
            .iter()
            .filter_map(|row| row.age_group.map(AgeGroup::label)),
    );
    columns.push(ColumnSummary {
        name: AgeGroup::COLUMN.to_string(),
        count,
        stats: ColumnStats::Categorical(groups),
    });

    SummaryTable { columns }
}

/// Linearly interpolated quantile of sorted values, `q` in `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Standard deviation with one degree of freedom removed.
pub fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
