use std::cmp::Ordering;

use super::genome::Coefficients;
use super::samples::Samples;

/// `a·x⁵ + b·x⁴ + c·x³ + d·x² + e·x + f`, evaluated with Horner's scheme.
pub fn predict(coefficients: &Coefficients, x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Sum of squared residuals of the polynomial over every sample.
///
/// A NaN sum is reported as `+inf` so overflowing genomes rank as the worst
/// possible fit instead of poisoning the ordering.
pub fn squared_error(coefficients: &Coefficients, samples: &Samples) -> f64 {
    let se: f64 = samples
        .iter()
        .map(|(x, y)| {
            let residual = predict(coefficients, x) - y;
            residual * residual
        })
        .sum();

    if se.is_nan() {
        f64::INFINITY
    } else {
        se
    }
}

/// Total order on errors, lowest first, with NaN after everything else.
pub fn compare_errors(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}
