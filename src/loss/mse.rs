pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output gradient of the squared error w.r.t. the output activation:
    /// 2·(predicted - expected).  Not divided by the output count; the trainer
    /// applies it per output neuron.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| 2.0 * (a - b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_outputs() {
        assert_eq!(MseLoss::loss(&[1.0, 3.0], &[0.0, 1.0]), 2.5);
        assert_eq!(MseLoss::derivative(&[1.0, 3.0], &[0.0, 1.0]), vec![2.0, 4.0]);
    }
}
