use std::f64::consts::PI;

use serde::Serialize;

use super::describe::sample_std;
use super::view::FilteredView;

/// Number of points sampled along the density curve.
const DENSITY_POINTS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    /// Exclusive, except for the last bin.
    pub end: f64,
    pub count: u64,
}

/// Equal-width histogram with a kernel density curve scaled to counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// `[x, y]` points of the density estimate; empty when it is undefined.
    pub density: Vec<[f64; 2]>,
}

impl Histogram {
    /// Sturges' rule for the bin count over the observed range.
    pub fn new(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        if min == max {
            return Self {
                bins: vec![HistogramBin {
                    start: min - 0.5,
                    end: max + 0.5,
                    count: sorted.len() as u64,
                }],
                density: Vec::new(),
            };
        }

        let num_bins = (sorted.len() as f64).log2().ceil() as usize + 1;
        let width = (max - min) / num_bins as f64;
        let mut bins: Vec<HistogramBin> = (0..num_bins)
            .map(|i| HistogramBin {
                start: min + width * i as f64,
                end: min + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        for v in &sorted {
            let idx = (((v - min) / width) as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        let density = kde(&sorted, min, max)
            .into_iter()
            .map(|[x, d]| [x, d * sorted.len() as f64 * width])
            .collect();

        Self { bins, density }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Gaussian kernel density with Scott's bandwidth, sampled over `[min, max]`.
fn kde(values: &[f64], min: f64, max: f64) -> Vec<[f64; 2]> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let Some(std) = sample_std(values, mean).filter(|s| *s > 0.0) else {
        return Vec::new();
    };
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());
    let step = (max - min) / (DENSITY_POINTS - 1) as f64;

    (0..DENSITY_POINTS)
        .map(|i| {
            let x = min + step * i as f64;
            let d = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>();
            [x, d * norm]
        })
        .collect()
}

pub fn age_histogram(view: &FilteredView<'_>) -> Histogram {
    Histogram::new(&view.numbers(view.schema().age()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values() {
        let h = Histogram::new(&[]);
        assert!(h.is_empty());
        assert!(h.density.is_empty());
    }

    #[test]
    fn counts_cover_every_value() {
        let values: Vec<f64> = (18..=90).map(f64::from).collect();
        let h = Histogram::new(&values);
        // 73 values → ceil(log2 73) + 1 = 8 bins
        assert_eq!(h.bins.len(), 8);
        assert_eq!(h.total(), 73);
        assert_eq!(h.bins.first().unwrap().start, 18.0);
        assert!((h.bins.last().unwrap().end - 90.0).abs() < 1e-9);
        assert_eq!(h.density.len(), DENSITY_POINTS);
    }

    #[test]
    fn constant_values_get_one_bin() {
        let h = Histogram::new(&[40.0, 40.0, 40.0]);
        assert_eq!(h.bins.len(), 1);
        assert_eq!(h.bins[0].count, 3);
        assert!(h.density.is_empty());
    }

    #[test]
    fn density_is_roughly_count_scaled() {
        let values: Vec<f64> = (0..400).map(|i| 20.0 + (i % 40) as f64).collect();
        let h = Histogram::new(&values);
        let step = h.density[1][0] - h.density[0][0];
        let width = h.bins[0].end - h.bins[0].start;
        let area: f64 = h.density.iter().map(|p| p[1] * step).sum::<f64>() / width;
        // Most of the mass lies inside the observed range.
        assert!(area > 0.7 * 400.0 && area < 1.05 * 400.0, "area {area}");
    }
}
