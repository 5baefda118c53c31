use std::ops::Index;

use rand::RngCore;
use rand_distr::{Distribution, Uniform};

use super::fitness::compare_errors;
use super::genome::Genome;
use super::samples::Samples;
use super::scheduler::Scheduler;

/// Fixed-size collection of genomes, owned by the evolution loop.
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    pub fn create(genomes: Vec<Genome>) -> Population {
        Population { genomes }
    }

    pub fn init<R: RngCore>(rng: &mut R, n_genomes: usize) -> Population {
        let genomes = (0..n_genomes).map(|_| Genome::init(rng)).collect();
        Population { genomes }
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Genome> {
        self.genomes.iter()
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn evaluate(&mut self, scheduler: &Scheduler, samples: &Samples) {
        scheduler.evaluate(&mut self.genomes, samples);
    }

    /// Sorts the population by ascending error and returns the first `n`.
    /// The sort is stable, so equal errors keep their relative order.
    pub fn best_n(&mut self, n: usize) -> Vec<Genome> {
        self.genomes.sort_by(|a, b| compare_errors(a.error, b.error));
        self.genomes.iter().take(n).cloned().collect()
    }

    /// Rebuilds every slot as a fresh copy of the elites, round-robin from index 0.
    pub fn replace_with_elites(&mut self, elites: &[Genome]) {
        assert!(!elites.is_empty(), "Tried to repopulate without elites");
        for (genome, elite) in self.genomes.iter_mut().zip(elites.iter().cycle()) {
            *genome = elite.copy();
        }
    }

    /// Mutates each genome independently with the given probability.
    /// `step` has the same precondition as [`Genome::mutate`].
    pub fn mutate_all<R: RngCore>(&mut self, rng: &mut R, probability: f64, step: f64) {
        let between = Uniform::from(0.0..1.0);
        for genome in self.genomes.iter_mut() {
            if between.sample(rng) < probability {
                genome.mutate(rng, step);
            }
        }
    }
}

impl Index<usize> for Population {
    type Output = Genome;
    fn index(&self, index: usize) -> &Self::Output {
        &self.genomes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::genome::N_COEFFICIENTS;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn tagged(tag: f64, error: f64) -> Genome {
        let mut genome = Genome::create([tag; N_COEFFICIENTS]);
        genome.error = error;
        genome
    }

    #[test]
    fn test_init() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let population = Population::init(&mut rng, 50);
        assert_eq!(population.len(), 50);
    }

    #[test]
    fn test_best_n_is_stable() {
        let mut population = Population::create(vec![
            tagged(0.0, 3.0),
            tagged(1.0, 1.0),
            tagged(2.0, 1.0),
            tagged(3.0, 2.0),
        ]);
        let best = population.best_n(2);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].coefficients[0], 1.0);
        assert_eq!(best[1].coefficients[0], 2.0);
        assert!(best.iter().all(|g| g.error == 1.0));
    }

    #[test]
    fn test_best_n_larger_than_population() {
        let mut population = Population::create(vec![tagged(0.0, 2.0), tagged(1.0, 0.5)]);
        let best = population.best_n(10);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].error, 0.5);
        assert_eq!(best[1].error, 2.0);
    }

    #[test]
    fn test_best_n_puts_non_finite_last() {
        let mut population = Population::create(vec![
            tagged(0.0, f64::NAN),
            tagged(1.0, f64::INFINITY),
            tagged(2.0, 4.0),
        ]);
        let best = population.best_n(3);
        assert_eq!(best[0].coefficients[0], 2.0);
        assert_eq!(best[1].coefficients[0], 1.0);
        assert!(best[2].error.is_nan());
    }

    #[test]
    fn test_replace_with_elites_cycles() {
        let mut population = Population::create((0..5).map(|i| tagged(10.0 + i as f64, 9.0)).collect());
        let elites = vec![tagged(0.0, 0.1), tagged(1.0, 0.2)];
        population.replace_with_elites(&elites);

        let tags: Vec<f64> = population.iter().map(|g| g.coefficients[0]).collect();
        assert_eq!(tags, vec![0.0, 1.0, 0.0, 1.0, 0.0]);
        assert!(population.iter().all(|g| g.error == 0.0));
    }

    #[test]
    #[should_panic(expected = "Tried to repopulate without elites")]
    fn test_replace_with_no_elites_panics() {
        let mut population = Population::create(vec![tagged(0.0, 1.0), tagged(1.0, 2.0)]);
        population.replace_with_elites(&[]);
    }

    #[test]
    fn test_mutate_all_respects_probability() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let mut population = Population::create((0..20).map(|_| tagged(1.0, 0.0)).collect());

        population.mutate_all(&mut rng, 0.0, 0.5);
        assert!(population.iter().all(|g| g.coefficients == [1.0; N_COEFFICIENTS]));

        population.mutate_all(&mut rng, 1.0, 0.5);
        assert!(population.iter().all(|g| g.coefficients.iter().all(|&c| c != 1.0)));
    }

    #[test]
    fn test_mutate_all_reproducible() {
        let run = || {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
            let mut population = Population::create((0..30).map(|_| tagged(0.0, 0.0)).collect());
            population.mutate_all(&mut rng, 0.3, 0.01);
            population.iter().map(|g| g.coefficients).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
