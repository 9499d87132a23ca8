//! Pixel canvas for the board and its conversion to terminal output.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use image::{Rgb, RgbImage};

use crate::layout::{Layout, TILE_PADDING};
use crate::picture::TilePictures;
use crate::puzzle::{Grid, Slide};

pub const BOARD_BACKGROUND: Rgb<u8> = Rgb([24, 24, 28]);

const UPPER_HALF: char = '▀';

pub struct Canvas {
    width: u16,
    height: u16,
    pixels: Vec<Rgb<u8>>,
}

impl Canvas {
    pub fn new(width: u16, height: u16, fill: Rgb<u8>) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb<u8>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Copies `picture` with its top-left corner at (`x`, `y`), clipping
    /// whatever falls outside the canvas.
    pub fn blit(&mut self, picture: &RgbImage, x: i32, y: i32) {
        for (px, py, color) in picture.enumerate_pixels() {
            let cx = x + px as i32;
            let cy = y + py as i32;
            if cx < 0 || cy < 0 || cx >= self.width as i32 || cy >= self.height as i32 {
                continue;
            }
            self.pixels[cy as usize * self.width as usize + cx as usize] = *color;
        }
    }

    /// Queues the canvas as upper half blocks, two pixel rows per terminal
    /// row, starting at terminal cell `origin`.
    pub fn flush<W: Write>(&self, out: &mut W, origin: (u16, u16)) -> io::Result<()> {
        let (column, row) = origin;

        for line in 0..self.height.div_ceil(2) {
            queue!(out, MoveTo(column, row + line))?;
            let mut last = None;
            for x in 0..self.width {
                let top = self.pixel(x, line * 2).unwrap_or(BOARD_BACKGROUND);
                let bottom = self.pixel(x, line * 2 + 1).unwrap_or(BOARD_BACKGROUND);
                if last != Some((top, bottom)) {
                    queue!(
                        out,
                        SetForegroundColor(to_color(top)),
                        SetBackgroundColor(to_color(bottom))
                    )?;
                    last = Some((top, bottom));
                }
                queue!(out, Print(UPPER_HALF))?;
            }
        }
        queue!(out, ResetColor)
    }
}

fn to_color(Rgb([r, g, b]): Rgb<u8>) -> Color {
    Color::Rgb { r, g, b }
}

/// Draws every tile at its current cell, except the sliding tile which is
/// drawn `progress` of the way from its old cell to its new one.
pub fn paint_board(
    grid: &Grid,
    pictures: &TilePictures,
    layout: &Layout,
    sliding: Option<(Slide, f32)>,
) -> Canvas {
    let board = layout.board();
    let mut canvas = Canvas::new(board.width, board.height, BOARD_BACKGROUND);

    for (id, tile) in grid.tiles() {
        let Some(picture) = pictures.scaled(id) else {
            continue;
        };

        let rect = layout.tile_rect(tile.current());
        let (mut x, mut y) = (rect.x as i32, rect.y as i32);
        if let Some((slide, progress)) = sliding.filter(|(slide, _)| slide.tile == id) {
            let from = layout.tile_rect(slide.from);
            let progress = progress.clamp(0.0, 1.0);
            x = lerp(from.x, rect.x, progress);
            y = lerp(from.y, rect.y, progress);
        }

        let pad = TILE_PADDING as i32;
        canvas.blit(picture, x + pad, y + pad);
    }

    canvas
}

fn lerp(from: u16, to: u16, t: f32) -> i32 {
    from as i32 + ((to as i32 - from as i32) as f32 * t).round() as i32
}
