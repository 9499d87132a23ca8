use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("invalid {parameter} '{value}': {reason}")]
    InvalidConfig {
        parameter: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to load picture '{}': {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("no picture for tile {label} in '{}'", dir.display())]
    MissingTile { label: String, dir: PathBuf },

    #[error("picture '{}' is {width}x{height}, too small for a {size}x{size} grid", path.display())]
    PictureTooSmall {
        path: PathBuf,
        width: u32,
        height: u32,
        size: usize,
    },

    #[error("failed to open log file '{}': {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

pub fn invalid_config(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PuzzleError {
    PuzzleError::InvalidConfig {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
