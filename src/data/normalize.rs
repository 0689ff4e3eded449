use serde::{Serialize, Deserialize};

use crate::data::dataset::{DataPoint, Dataset};

/// Replacement for a feature standard deviation of exactly zero.
pub const STD_EPSILON: f64 = 1e-6;

/// A dataset whose inputs have been standardized per feature.
///
/// `base` keeps the raw dataset so plots and probes can work in raw input
/// space; `points` hold `(x - mean) / std` with targets untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDataset {
    pub base: Dataset,
    pub points: Vec<DataPoint>,
    pub input_mean: Vec<f64>,
    pub input_std: Vec<f64>,
}

impl NormalizedDataset {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Computes per-feature mean and population standard deviation and returns
/// a standardized copy of `dataset`.  The source is left untouched.
pub fn normalize_dataset(dataset: &Dataset) -> NormalizedDataset {
    let input_size = dataset.input_size;
    let n = dataset.points.len();

    let mut mean = vec![0.0; input_size];
    let mut std = vec![0.0; input_size];

    if n > 0 {
        for point in &dataset.points {
            for (m, x) in mean.iter_mut().zip(&point.x) {
                *m += x;
            }
        }
        for m in mean.iter_mut() {
            *m /= n as f64;
        }

        for point in &dataset.points {
            for ((s, m), x) in std.iter_mut().zip(&mean).zip(&point.x) {
                let diff = x - m;
                *s += diff * diff;
            }
        }
        for s in std.iter_mut() {
            *s = (*s / n as f64).sqrt();
        }
    }

    for s in std.iter_mut() {
        if *s == 0.0 {
            *s = STD_EPSILON;
        }
    }

    let points = dataset
        .points
        .iter()
        .map(|point| DataPoint {
            x: standardize(&point.x, &mean, &std),
            ..point.clone()
        })
        .collect();

    NormalizedDataset {
        base: dataset.clone(),
        points,
        input_mean: mean,
        input_std: std,
    }
}

/// `(value - mean) / std` element-wise.
pub fn standardize(values: &[f64], mean: &[f64], std: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(mean.iter().zip(std))
        .map(|(v, (m, s))| (v - m) / s)
        .collect()
}
