use serde::Serialize;

use super::view::FilteredView;

/// Pairwise Pearson correlation between the numeric columns of a view.
///
/// A cell is `None` when fewer than two paired observations exist or either
/// side has zero variance. Empty for an empty view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` × `columns.len()`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        self.values[i][j]
    }
}

pub fn correlation(view: &FilteredView<'_>) -> CorrelationMatrix {
    if view.is_empty() {
        return CorrelationMatrix::default();
    }
    let schema = view.schema();
    let (columns, series): (Vec<String>, Vec<Vec<Option<f64>>>) = schema
        .numeric_columns()
        .map(|i| {
            let values = view.records().map(|r| r.number(i)).collect();
            (schema.column(i).name.clone(), values)
        })
        .unzip();

    CorrelationMatrix {
        columns,
        values: pairwise(&series),
    }
}

/// Correlate every pair of series, skipping rows missing on either side.
pub fn pairwise(series: &[Vec<Option<f64>>]) -> Vec<Vec<Option<f64>>> {
    let n = series.len();
    let mut out = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let pairs = series[i]
                .iter()
                .zip(&series[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .filter(|(a, b)| !a.is_nan() && !b.is_nan());
            let r = pearson(pairs);
            out[i][j] = r;
            out[j][i] = r;
        }
    }
    out
}

pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_correlations() {
        let up = pearson([(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        let down = pearson([(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]).unwrap();
        assert!((up - 1.0).abs() < 1e-12);
        assert!((down + 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_undefined() {
        assert_eq!(pearson([(1.0, 2.0)]), None);
        assert_eq!(pearson([(1.0, 2.0), (1.0, 5.0), (1.0, 7.0)]), None);
        assert_eq!(pearson(std::iter::empty()), None);
    }

    #[test]
    fn pairwise_deletion_skips_missing_values() {
        let series = vec![
            vec![Some(1.0), Some(2.0), None, Some(4.0)],
            vec![Some(2.0), Some(4.0), Some(100.0), Some(f64::NAN)],
        ];
        let m = pairwise(&series);
        assert!((m[0][1].unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(m[0][1], m[1][0]);
        assert!((m[0][0].unwrap() - 1.0).abs() < 1e-12);
    }
}
