use log::info;
use rand::RngCore;

use super::error::Result;
use super::genome::Genome;
use super::population::Population;
use super::samples::Samples;
use super::scheduler::Scheduler;
use super::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Evaluating,
    Selecting,
    Repopulating,
    Mutating,
    Converged,
    /// Hit `max_generations` without converging.
    Exhausted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Converged | Phase::Exhausted)
    }
}

/// Best error observed after selecting from generation `generation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub generation: usize,
    pub loss: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    pub best: Genome,
    pub loss: f64,
    /// Number of generations evaluated.
    pub generations: usize,
    pub converged: bool,
}

/// Generational search driving a population towards the samples.
///
/// Owns the population, the random source and the worker pool. Each call to
/// [`Evolution::step`] performs one transition:
/// `Initializing → Evaluating → Selecting → Repopulating → Mutating → Evaluating …`
/// until selection finds a loss below the threshold.
pub struct Evolution<'a, R: RngCore> {
    settings: &'a Settings,
    samples: &'a Samples,
    scheduler: Scheduler,
    rng: R,
    population: Population,
    elites: Vec<Genome>,
    phase: Phase,
    generation: usize,
    loss: f64,
}

impl<'a, R: RngCore> Evolution<'a, R> {
    pub fn new(settings: &'a Settings, samples: &'a Samples, rng: R) -> Result<Evolution<'a, R>> {
        settings.validate()?;
        let scheduler = Scheduler::new(settings.n_workers)?;
        Ok(Evolution {
            settings,
            samples,
            scheduler,
            rng,
            population: Population::create(Vec::new()),
            elites: Vec::new(),
            phase: Phase::Initializing,
            generation: 0,
            loss: f64::INFINITY,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best error of the latest selection, `+inf` before the first one.
    pub fn loss(&self) -> f64 {
        self.loss
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn elites(&self) -> &[Genome] {
        &self.elites
    }

    pub fn step(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Initializing => {
                self.population = Population::init(&mut self.rng, self.settings.n_genomes);
                Phase::Evaluating
            }
            Phase::Evaluating => {
                self.population.evaluate(&self.scheduler, self.samples);
                Phase::Selecting
            }
            Phase::Selecting => {
                self.elites = self.population.best_n(self.settings.n_elites);
                self.loss = self.elites[0].error;
                if self.loss < self.settings.loss_threshold {
                    Phase::Converged
                } else if self.settings.max_generations.is_some_and(|max| self.generation + 1 >= max) {
                    Phase::Exhausted
                } else {
                    Phase::Repopulating
                }
            }
            Phase::Repopulating => {
                self.population.replace_with_elites(&self.elites);
                Phase::Mutating
            }
            Phase::Mutating => {
                self.population.mutate_all(&mut self.rng, self.settings.mutation_rate, self.settings.learning_rate);
                self.generation += 1;
                Phase::Evaluating
            }
            terminal @ (Phase::Converged | Phase::Exhausted) => terminal,
        };
        self.phase
    }

    pub fn run(self) -> Fit {
        self.run_with(|_| {})
    }

    /// Runs to a terminal phase, handing `observer` the loss of every generation.
    pub fn run_with<F: FnMut(Progress)>(mut self, mut observer: F) -> Fit {
        info!(
            "evolving {} genomes against {} samples on {} workers",
            self.settings.n_genomes,
            self.samples.len(),
            self.scheduler.n_workers()
        );

        while !self.phase.is_terminal() {
            let finished = self.phase;
            self.step();
            if finished == Phase::Selecting {
                let progress = Progress { generation: self.generation, loss: self.loss };
                let interval = self.settings.report_interval;
                if interval > 0 && progress.generation % interval == 0 {
                    info!("generation: {}, loss: {:.6}", progress.generation, progress.loss);
                }
                observer(progress);
            }
        }

        let converged = self.phase == Phase::Converged;
        if converged {
            info!("converged after {} generations with loss {:.6}", self.generation + 1, self.loss);
        } else {
            info!("stopped after {} generations with loss {:.6}", self.generation + 1, self.loss);
        }

        Fit {
            best: self.elites.swap_remove(0),
            loss: self.loss,
            generations: self.generation + 1,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn line_samples() -> Samples {
        Samples::from_pairs(&[(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).unwrap()
    }

    fn small_settings() -> Settings {
        Settings {
            n_genomes: 200,
            n_elites: 5,
            n_workers: 3,
            learning_rate: 0.05,
            loss_threshold: 1e-6,
            max_generations: Some(30),
            report_interval: 0,
            ..Settings::standard()
        }
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let samples = line_samples();
        let settings = Settings { n_elites: 0, ..small_settings() };
        let rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(Evolution::new(&settings, &samples, rng).is_err());
    }

    #[test]
    fn test_step_follows_phase_order() {
        let samples = line_samples();
        let settings = small_settings();
        let rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut evolution = Evolution::new(&settings, &samples, rng).unwrap();

        assert_eq!(evolution.phase(), Phase::Initializing);
        assert_eq!(evolution.step(), Phase::Evaluating);
        assert_eq!(evolution.population().len(), 200);
        assert_eq!(evolution.step(), Phase::Selecting);
        assert_eq!(evolution.step(), Phase::Repopulating);
        assert_eq!(evolution.elites().len(), 5);
        assert_eq!(evolution.step(), Phase::Mutating);
        assert_eq!(evolution.generation(), 0);
        assert_eq!(evolution.step(), Phase::Evaluating);
        assert_eq!(evolution.generation(), 1);
    }

    #[test]
    fn test_loss_never_increases() {
        let samples = line_samples();
        let settings = small_settings();
        let rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let mut losses = Vec::new();
        let fit = Evolution::new(&settings, &samples, rng)
            .unwrap()
            .run_with(|progress| losses.push(progress.loss));

        assert_eq!(losses.len(), fit.generations);
        for pair in losses.windows(2) {
            assert!(pair[1] <= pair[0], "loss went up: {:?}", pair);
        }
    }

    #[test]
    fn test_generation_ceiling_exhausts() {
        let samples = line_samples();
        let settings = Settings { loss_threshold: 1e-300, max_generations: Some(4), ..small_settings() };
        let rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let fit = Evolution::new(&settings, &samples, rng).unwrap().run();
        assert!(!fit.converged);
        assert_eq!(fit.generations, 4);
        assert_eq!(fit.loss, fit.best.error);
    }

    #[test]
    fn test_exact_genome_converges_immediately() {
        let samples = line_samples();
        let settings = Settings { max_generations: None, ..small_settings() };
        let rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let mut evolution = Evolution::new(&settings, &samples, rng).unwrap();
        evolution.step();
        evolution.population = Population::create(vec![
            Genome::create([1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
            Genome::create([0.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            Genome::create([0.0; 6]),
            Genome::create([0.0; 6]),
            Genome::create([0.0; 6]),
        ]);
        let fit = evolution.run();
        assert!(fit.converged);
        assert_eq!(fit.generations, 1);
        assert_eq!(fit.best.coefficients, [0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(fit.loss, 0.0);
    }
}
