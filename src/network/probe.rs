//! Dense prediction sweeps used to draw fitted curves and decision surfaces.

use serde::Serialize;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::network::network::Network;

pub const DEFAULT_CURVE_SAMPLES: usize = 40;

/// Probability substituted for a prediction that is not finite.
const UNDECIDED: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// One cell of a decision grid.  `x`/`y` are the cell's lower-left corner in
/// the unit square; `value` the prediction at its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Predictions at `samples + 1` evenly spaced raw inputs spanning the
/// dataset's range of feature 0.  With `samples == 0` the curve is the single
/// point at the minimum.
pub fn regression_curve(network: &Network, dataset: &Dataset, samples: usize) -> Result<Vec<CurvePoint>> {
    let Some((min_x, max_x)) = dataset.feature_range(0) else {
        return Ok(Vec::new());
    };
    (0..=samples)
        .map(|i| -> Result<CurvePoint> {
            let t = if samples == 0 { 0.0 } else { i as f64 / samples as f64 };
            let x = min_x + t * (max_x - min_x);
            let y = network.predict(&[x])?[0];
            Ok(CurvePoint { x, y })
        })
        .collect()
}

/// Output-0 prediction over an `n x n` grid of the unit square, column by
/// column.  Requires a two-input network.
pub fn decision_grid(network: &Network, resolution: usize) -> Result<Vec<GridCell>> {
    if network.input_size < 2 {
        return Err(NnError::DimensionMismatch {
            what: "decision grid input",
            expected: 2,
            actual: network.input_size,
        });
    }

    let n = resolution as f64;
    let mut cells = Vec::with_capacity(resolution * resolution);
    for i in 0..resolution {
        for j in 0..resolution {
            let cx = (i as f64 + 0.5) / n;
            let cy = (j as f64 + 0.5) / n;
            let prediction = network.predict(&[cx, cy])?[0];
            let value = if prediction.is_finite() { prediction } else { UNDECIDED };
            cells.push(GridCell { x: i as f64 / n, y: j as f64 / n, value });
        }
    }
    Ok(cells)
}
