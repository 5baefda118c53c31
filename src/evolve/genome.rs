use std::fmt;

use rand::RngCore;
use rand_distr::{Distribution, Uniform};
use super::fitness;
use super::samples::Samples;

pub const N_COEFFICIENTS: usize = 6;

/// Coefficients ordered from the x⁵ term down to the constant.
pub type Coefficients = [f64; N_COEFFICIENTS];

/// Coefficients of a freshly initialized genome are drawn from `-INIT_BOUND..INIT_BOUND`.
pub const INIT_BOUND: f64 = 10.0;

/// One candidate quintic.
///
/// `error` is a cached evaluation result: it is only meaningful after
/// [`Genome::evaluate`] and is reset whenever an offspring is made with
/// [`Genome::copy`]. `Clone` keeps it, which is what selection relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    pub coefficients: Coefficients,
    pub error: f64,
}

impl Genome {
    pub fn create(coefficients: Coefficients) -> Genome {
        Genome { coefficients, error: 0.0 }
    }

    pub fn init<R: RngCore>(rng: &mut R) -> Genome {
        let between = Uniform::new_inclusive(-INIT_BOUND, INIT_BOUND);
        let mut coefficients = [0.0; N_COEFFICIENTS];
        for c in coefficients.iter_mut() {
            *c = between.sample(rng);
        }
        Genome::create(coefficients)
    }

    /// Offspring with identical coefficients and no error yet.
    pub fn copy(&self) -> Genome {
        Genome::create(self.coefficients)
    }

    /// Shifts every coefficient by an independent draw from `-step..=step`.
    ///
    /// `step` must be finite and non-negative; `Settings::validate` enforces
    /// this for `learning_rate`. Panics otherwise.
    pub fn mutate<R: RngCore>(&mut self, rng: &mut R, step: f64) {
        assert!(step.is_finite() && step >= 0.0, "mutation step must be finite and non-negative, got {}", step);
        let between = Uniform::new_inclusive(-step, step);
        for c in self.coefficients.iter_mut() {
            *c += between.sample(rng);
        }
    }

    pub fn evaluate(&mut self, samples: &Samples) {
        self.error = fitness::squared_error(&self.coefficients, samples);
    }

    pub fn predict(&self, x: f64) -> f64 {
        fitness::predict(&self.coefficients, x)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.coefficients;
        write!(
            f,
            "a: {:.4}, b: {:.4}, c: {:.4}, d: {:.4}, e: {:.4}, f: {:.4}, error: {:.6}",
            a, b, c, d, e, g, self.error
        )
    }
}
