//! Command-line arguments and the validated settings derived from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{invalid_config, Result};
use crate::picture::PictureSource;
use crate::session::Pace;

pub const DEFAULT_SIZE: usize = 4;
pub const MIN_SIZE: usize = 2;
// Asset names carry one digit per coordinate.
pub const MAX_SIZE: usize = 9;
pub const DEFAULT_SLIDE_MS: u64 = 100;
pub const DEFAULT_SHUFFLE_MS: u64 = 25;

#[derive(Parser, Debug)]
#[command(name = "picture-slide", author, version, about = "Sliding-tile picture puzzle for the terminal")]
pub struct Args {
    /// Tiles per side of the grid.
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Directory holding Picture{row}{col}.jpg (or .png) for every home cell.
    #[arg(long, conflicts_with = "image")]
    pub pictures: Option<PathBuf>,

    /// A single image to cut into tiles.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Duration of one slide after a tap, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SLIDE_MS)]
    pub slide_ms: u64,

    /// Duration of one slide while shuffling, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SHUFFLE_MS)]
    pub shuffle_ms: u64,

    /// Row/column move pairs performed per shuffle.
    #[arg(long, default_value_t = 1)]
    pub shuffle_rounds: usize,

    /// Seed for reproducible shuffles.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Tracing filter, e.g. "info", "picture_slide=debug".
    #[arg(long, default_value = "info")]
    pub log: String,

    /// Print a shuffle to stdout instead of starting the terminal UI.
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub size: usize,
    pub pictures: PictureSource,
    pub slide: Duration,
    pub shuffle: Duration,
    pub shuffle_rounds: usize,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log: String,
    pub headless: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&args.size) {
            return Err(invalid_config(
                "size",
                &args.size,
                &format!("must be between {MIN_SIZE} and {MAX_SIZE}"),
            ));
        }
        if args.shuffle_rounds == 0 {
            return Err(invalid_config(
                "shuffle-rounds",
                &args.shuffle_rounds,
                &"must be at least 1",
            ));
        }
        if args.slide_ms == 0 {
            return Err(invalid_config("slide-ms", &args.slide_ms, &"must be positive"));
        }
        if args.shuffle_ms == 0 {
            return Err(invalid_config(
                "shuffle-ms",
                &args.shuffle_ms,
                &"must be positive",
            ));
        }

        let pictures = match (args.pictures, args.image) {
            (Some(dir), _) => PictureSource::Directory(dir),
            (None, Some(path)) => PictureSource::Single(path),
            (None, None) => PictureSource::Generated,
        };

        Ok(Self {
            size: args.size,
            pictures,
            slide: Duration::from_millis(args.slide_ms),
            shuffle: Duration::from_millis(args.shuffle_ms),
            shuffle_rounds: args.shuffle_rounds,
            seed: args.seed,
            log_file: args.log_file,
            log: args.log,
            headless: args.headless,
        })
    }

    pub fn duration(&self, pace: Pace) -> Duration {
        match pace {
            Pace::Normal => self.slide,
            Pace::Fast => self.shuffle,
        }
    }
}
