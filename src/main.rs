use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use quintic_evolve::evolve::{Evolution, Samples, Settings};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

#[derive(Parser)]
#[command(name = "quintic-evolve")]
#[command(about = "Fit a quintic polynomial to (x, y) samples with an evolutionary search")]
struct Args {
    /// CSV file with a header row followed by x,y rows
    #[arg(default_value = "assets/data.csv")]
    data: PathBuf,

    /// TOML file with run settings
    #[arg(short, long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    workers: Option<usize>,

    /// Stop once the best error is below this
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Give up after this many generations
    #[arg(long)]
    max_generations: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path).with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::standard(),
    };
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(workers) = args.workers {
        settings.n_workers = workers;
    }
    if let Some(threshold) = args.threshold {
        settings.loss_threshold = threshold;
    }
    if args.max_generations.is_some() {
        settings.max_generations = args.max_generations;
    }

    log::debug!("resolved settings:\n{}", settings.to_toml_string()?);

    let samples = Samples::load(&args.data).with_context(|| format!("failed to read samples from {}", args.data.display()))?;

    let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("seed: {}", seed);
    let rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let fit = Evolution::new(&settings, &samples, rng)?.run();

    if fit.converged {
        println!("converged after {} generations", fit.generations);
    } else {
        println!("did not converge within {} generations", fit.generations);
    }
    println!("{}", fit.best);
    Ok(())
}
