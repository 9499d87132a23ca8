//! Tile pictures: loading, cutting and rescaling.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tracing::{debug, info};

use crate::error::{PuzzleError, Result};
use crate::puzzle::{Grid, TileId};

const ASSET_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
// Edge length of each tile of the generated picture before scaling.
const GENERATED_TILE: u32 = 48;

#[derive(Debug, Clone)]
pub enum PictureSource {
    /// A picture drawn in code, used when no image is given.
    Generated,
    /// One `Picture{row}{col}` file per home cell.
    Directory(PathBuf),
    /// One image cut into a grid of tiles.
    Single(PathBuf),
}

/// Source pictures for every tile, indexed by [`TileId`], plus a copy scaled
/// to the current tile size.
pub struct TilePictures {
    sources: Vec<RgbImage>,
    scaled: Vec<RgbImage>,
    scaled_size: u32,
}

impl TilePictures {
    pub fn load(source: &PictureSource, grid: &Grid) -> Result<Self> {
        let sources = match source {
            PictureSource::Generated => cut(&generate(grid.size()), grid),
            PictureSource::Directory(dir) => from_directory(dir, grid)?,
            PictureSource::Single(path) => {
                let picture = open(path)?;
                let size = grid.size() as u32;
                if picture.width() < size || picture.height() < size {
                    return Err(PuzzleError::PictureTooSmall {
                        path: path.clone(),
                        width: picture.width(),
                        height: picture.height(),
                        size: grid.size(),
                    });
                }
                cut(&picture, grid)
            }
        };
        info!(tiles = sources.len(), ?source, "loaded pictures");

        Ok(Self {
            scaled: sources.clone(),
            sources,
            scaled_size: 0,
        })
    }

    /// Rescales every tile to `size`×`size` unless it already is.
    pub fn rescale(&mut self, size: u32) {
        if size == self.scaled_size || size == 0 {
            return;
        }
        debug!(size, "rescaling tile pictures");
        self.scaled = self
            .sources
            .iter()
            .map(|picture| imageops::resize(picture, size, size, FilterType::Triangle))
            .collect();
        self.scaled_size = size;
    }

    pub fn scaled(&self, id: TileId) -> Option<&RgbImage> {
        self.scaled.get(id.0)
    }
}

fn open(path: &Path) -> Result<RgbImage> {
    image::open(path)
        .map(|picture| picture.to_rgb8())
        .map_err(|source| PuzzleError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}

fn from_directory(dir: &Path, grid: &Grid) -> Result<Vec<RgbImage>> {
    grid.tiles()
        .map(|(_, tile)| {
            let label = tile.label();
            let path = ASSET_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{label}.{ext}")))
                .find(|path| path.is_file())
                .ok_or_else(|| PuzzleError::MissingTile {
                    label: label.clone(),
                    dir: dir.to_path_buf(),
                })?;
            open(&path)
        })
        .collect()
}

/// Cuts the largest centred square of `picture` into one piece per tile.
fn cut(picture: &RgbImage, grid: &Grid) -> Vec<RgbImage> {
    let size = grid.size() as u32;
    let piece = picture.width().min(picture.height()) / size;
    let left = (picture.width() - piece * size) / 2;
    let top = (picture.height() - piece * size) / 2;

    grid.tiles()
        .map(|(_, tile)| {
            let home = tile.home();
            imageops::crop_imm(
                picture,
                left + home.col as u32 * piece,
                top + home.row as u32 * piece,
                piece,
                piece,
            )
            .to_image()
        })
        .collect()
}

/// Night sky with a tree, big enough that every tile looks different.
fn generate(size: usize) -> RgbImage {
    let side = GENERATED_TILE * size as u32;
    let centre = side as f32 / 2.0;

    RgbImage::from_fn(side, side, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        let depth = fy / side as f32;

        // Tree: a triangle above a trunk.
        let top = side as f32 * 0.15;
        let base = side as f32 * 0.8;
        let half_width = (fy - top) / (base - top) * side as f32 * 0.35;
        if fy >= top && fy <= base && (fx - centre).abs() <= half_width {
            let stripe = ((fy - top) / (side as f32 * 0.08)) as u32 % 3;
            return match stripe {
                0 => Rgb([20, 110, 45]),
                1 => Rgb([30, 140, 60]),
                _ => Rgb([200, 40, 40]),
            };
        }
        if fy > base && fy <= base + side as f32 * 0.1 && (fx - centre).abs() <= side as f32 * 0.05
        {
            return Rgb([100, 60, 30]);
        }
        if fy > side as f32 * 0.88 {
            return Rgb([235, 240, 250]);
        }

        let sparkle = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) % 211 == 0;
        if sparkle {
            Rgb([255, 255, 220])
        } else {
            Rgb([
                (10.0 + 40.0 * depth) as u8,
                (15.0 + 30.0 * depth) as u8,
                (60.0 + 90.0 * depth) as u8,
            ])
        }
    })
}
