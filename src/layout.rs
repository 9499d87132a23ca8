//! Screen geometry recomputed whenever the terminal is resized.
//!
//! The board is measured in pixels, two per terminal row (each row is drawn
//! with upper half blocks). The control panel is measured in terminal cells.

use crate::puzzle::Cell;

// Space kept for the control panel next to or under the board.
pub const PANEL_COLUMNS: u16 = 26;
pub const PANEL_ROWS: u16 = 5;
// Tiles smaller than this leave nothing visible inside the padding.
const MIN_TILE: u16 = 3;
pub const TILE_PADDING: u16 = 1;

pub const SHUFFLE_LABEL: &str = "[ Shuffle ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Panel below the board.
    Vertical,
    /// Panel to the right of the board.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub orientation: Orientation,
    pub tile_size: u16,
    size: usize,
    /// Top-left terminal cell of the control panel.
    pub panel: (u16, u16),
}

impl Layout {
    /// Returns `None` when the viewport is too small to show the board.
    pub fn compute(columns: u16, rows: u16, size: usize) -> Option<Self> {
        if columns == 0 || rows == 0 || size == 0 {
            return None;
        }

        let width = columns;
        let height = rows.saturating_mul(2);
        let orientation = if width < height {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };

        let (board_width, board_height) = match orientation {
            Orientation::Vertical => (width, rows.saturating_sub(PANEL_ROWS) * 2),
            Orientation::Horizontal => (width.saturating_sub(PANEL_COLUMNS), height),
        };

        let tile_size = board_width.min(board_height) / size as u16;
        if tile_size < MIN_TILE {
            return None;
        }

        let side = tile_size * size as u16;
        let panel = match orientation {
            Orientation::Vertical => (0, side.div_ceil(2) + 1),
            Orientation::Horizontal => (side + 2, 1),
        };

        Some(Self {
            orientation,
            tile_size,
            size,
            panel,
        })
    }

    /// Board bounds in pixels.
    pub fn board(&self) -> Rect {
        let side = self.tile_size * self.size as u16;
        Rect {
            x: 0,
            y: 0,
            width: side,
            height: side,
        }
    }

    /// Pixel rectangle of `cell`.
    pub fn tile_rect(&self, cell: Cell) -> Rect {
        Rect {
            x: cell.col as u16 * self.tile_size,
            y: cell.row as u16 * self.tile_size,
            width: self.tile_size,
            height: self.tile_size,
        }
    }

    /// Edge length of the picture drawn inside a tile's padding.
    pub fn picture_size(&self) -> u16 {
        self.tile_size - 2 * TILE_PADDING
    }

    /// Grid cell under the terminal cell at (`column`, `row`).
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Cell> {
        let (x, y) = (column, row.saturating_mul(2));
        if !self.board().contains(x, y) {
            return None;
        }
        Some(Cell::new(
            (y / self.tile_size) as usize,
            (x / self.tile_size) as usize,
        ))
    }

    /// Terminal cells covered by the shuffle control.
    pub fn shuffle_button(&self) -> Rect {
        let (x, y) = self.panel;
        Rect {
            x,
            y: y + 2,
            width: SHUFFLE_LABEL.chars().count() as u16,
            height: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminal_puts_panel_beside_board() {
        let layout = Layout::compute(120, 40, 4).unwrap();

        assert_eq!(layout.orientation, Orientation::Horizontal);
        assert_eq!(layout.tile_size, 20);
        assert_eq!(layout.panel, (82, 1));
    }

    #[test]
    fn tall_terminal_puts_panel_below_board() {
        let layout = Layout::compute(40, 60, 4).unwrap();

        assert_eq!(layout.orientation, Orientation::Vertical);
        assert_eq!(layout.tile_size, 10);
        assert_eq!(layout.panel, (0, 21));
    }

    #[test]
    fn tiny_terminal_has_no_layout() {
        assert_eq!(Layout::compute(0, 0, 4), None);
        assert_eq!(Layout::compute(30, 6, 4), None);
    }

    #[test]
    fn tile_rects_cover_board_without_overlap() {
        let layout = Layout::compute(100, 30, 4).unwrap();
        let board = layout.board();
        let mut covered = vec![0u8; board.width as usize * board.height as usize];

        for row in 0..4 {
            for col in 0..4 {
                let rect = layout.tile_rect(Cell::new(row, col));
                for y in rect.y..rect.y + rect.height {
                    for x in rect.x..rect.x + rect.width {
                        covered[y as usize * board.width as usize + x as usize] += 1;
                    }
                }
            }
        }

        assert!(covered.iter().all(|&n| n == 1));
    }

    #[test]
    fn hit_test_inverts_tile_rects() {
        let layout = Layout::compute(120, 40, 4).unwrap();

        for row in 0..4 {
            for col in 0..4 {
                let cell = Cell::new(row, col);
                let rect = layout.tile_rect(cell);
                let terminal_row = (rect.y + rect.height / 2) / 2;
                assert_eq!(layout.hit_test(rect.x + 1, terminal_row), Some(cell));
            }
        }
        assert_eq!(layout.hit_test(90, 5), None);
        assert_eq!(layout.hit_test(5, 40), None);
    }

    #[test]
    fn shuffle_button_sits_in_panel() {
        let layout = Layout::compute(120, 40, 4).unwrap();
        let button = layout.shuffle_button();

        assert!(button.contains(82, 3));
        assert!(!button.contains(82, 1));
        assert_eq!(layout.hit_test(button.x, button.y), None);
    }
}
