use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{EvolveError, Result};

/// Run configuration, fixed once the evolution loop starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Population size.
    pub n_genomes: usize,
    /// Number of elites that parent the next generation.
    pub n_elites: usize,
    /// Probability that a single genome is mutated after repopulation.
    pub mutation_rate: f64,
    /// Bound of the uniform perturbation added to every coefficient on mutation.
    pub learning_rate: f64,
    /// The loop stops once the best error drops below this.
    pub loss_threshold: f64,
    pub n_workers: usize,
    /// `None` lets the loop run until it converges.
    pub max_generations: Option<usize>,
    /// Log progress every this many generations; 0 disables it.
    pub report_interval: usize,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::standard()
    }
}

impl Settings {
    pub fn standard() -> Settings {
        Settings {
            n_genomes: 12000,
            n_elites: 10,
            mutation_rate: 0.3,
            learning_rate: 0.01,
            loss_threshold: 0.5,
            n_workers: available_workers(),
            max_generations: None,
            report_interval: 100,
            seed: None,
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let input = std::fs::read_to_string(path)?;
        Settings::from_toml_str(&input)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_elites == 0 {
            return Err(configuration("n_elites must be at least 1"));
        }
        if self.n_genomes < self.n_elites {
            return Err(configuration(format!(
                "n_genomes ({}) must not be smaller than n_elites ({})",
                self.n_genomes, self.n_elites
            )));
        }
        if self.n_workers == 0 {
            return Err(configuration("n_workers must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(configuration("mutation_rate must be between 0 and 1"));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(configuration("learning_rate must be a positive finite number"));
        }
        if !self.loss_threshold.is_finite() || self.loss_threshold <= 0.0 {
            return Err(configuration("loss_threshold must be a positive finite number"));
        }
        if self.max_generations == Some(0) {
            return Err(configuration("max_generations must be at least 1 when set"));
        }
        Ok(())
    }
}

fn configuration<S: Into<String>>(message: S) -> EvolveError {
    EvolveError::Configuration(message.into())
}

fn available_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
