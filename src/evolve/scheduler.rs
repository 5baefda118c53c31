use std::ops::Range;

use itertools::Itertools;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::error::Result;
use super::genome::Genome;
use super::samples::Samples;

/// Splits `0..n_items` into `n_shards` contiguous ranges covering every index
/// exactly once. The first `n_items % n_shards` shards take one extra item.
pub fn shard_bounds(n_items: usize, n_shards: usize) -> Vec<Range<usize>> {
    if n_shards == 0 {
        return Vec::new();
    }
    let base = n_items / n_shards;
    let extra = n_items % n_shards;
    (0..n_shards)
        .scan(0, |start, shard| {
            let len = base + usize::from(shard < extra);
            let range = *start..*start + len;
            *start += len;
            Some(range)
        })
        .collect_vec()
}

fn split_shards<'a, T>(items: &'a mut [T], bounds: &[Range<usize>]) -> Vec<&'a mut [T]> {
    let mut rest = items;
    let mut shards = Vec::with_capacity(bounds.len());
    for range in bounds {
        let (shard, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        shards.push(shard);
        rest = tail;
    }
    debug_assert!(rest.is_empty(), "shard bounds left items uncovered");
    shards
}

/// Fixed-size worker pool that evaluates the population one shard per worker.
pub struct Scheduler {
    pool: ThreadPool,
    n_workers: usize,
}

impl Scheduler {
    pub fn new(n_workers: usize) -> Result<Scheduler> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .thread_name(|i| format!("evaluator-{}", i))
            .build()?;
        log::debug!("built evaluation pool with {} workers", n_workers);
        Ok(Scheduler { pool, n_workers })
    }

    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    /// Runs `f` over one shard per worker in parallel and returns once every
    /// shard is done. `f` also receives the shard's index.
    pub fn for_each_shard<T, F>(&self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        let bounds = shard_bounds(items.len(), self.n_workers);
        let shards = split_shards(items, &bounds);
        self.pool.install(|| {
            shards
                .into_par_iter()
                .enumerate()
                .for_each(|(i, shard)| f(i, shard));
        });
    }

    pub fn evaluate(&self, genomes: &mut [Genome], samples: &Samples) {
        self.for_each_shard(genomes, |_, shard| {
            for genome in shard.iter_mut() {
                genome.evaluate(samples);
            }
        });
    }
}
