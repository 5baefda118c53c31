//! Fits a quintic polynomial to observed points with a generational
//! evolutionary search: parallel evaluation, truncation selection and
//! uniform mutation, repeated until the best error drops below a threshold.

pub mod error;
pub mod evolution;
pub mod fitness;
pub mod genome;
pub mod population;
pub mod samples;
pub mod scheduler;
pub mod settings;

pub use error::{EvolveError, Result};
pub use evolution::{Evolution, Fit, Phase, Progress};
pub use genome::Genome;
pub use samples::Samples;
pub use settings::Settings;
