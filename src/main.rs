mod config;
mod error;
mod layout;
mod picture;
mod puzzle;
mod render;
mod session;
mod ui;

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Args, Config};
use error::PuzzleError;
use session::{Event, Session};

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    init_logging(&config)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if config.headless {
        run_headless(&config, &mut rng);
        return Ok(());
    }

    ui::run(&config, rng).context("puzzle UI failed")
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log)
        .with_context(|| format!("invalid log filter '{}'", config.log))?;

    if let Some(path) = &config.log_file {
        let file = File::create(path).map_err(|source| PuzzleError::LogFile {
            path: path.clone(),
            source,
        })?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else if config.headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    // The terminal UI owns stdout, so without a log file nothing is installed.

    Ok(())
}

fn run_headless(config: &Config, rng: &mut StdRng) {
    let mut session = Session::new(config.size).with_shuffle_rounds(config.shuffle_rounds);
    let mut replay = session.grid().clone();

    println!("Initial Puzzle:\n{}", session.grid());

    session.shuffle(rng);
    let events = session.settle();

    for event in events {
        if let Event::Slid { slide, .. } = event {
            replay.shift_into_empty(slide.from);
            println!("{}\n{}", slide, replay);
        }
    }

    println!("Shuffled Puzzle:\n{}", session.grid());
}
