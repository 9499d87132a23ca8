use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn is_adjacent(&self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The way a tile travels when it slides into the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Offset from the gap to the tile that would move in this direction.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Left => (0, 1),
            Direction::Down => (-1, 0),
            Direction::Right => (0, -1),
        }
    }

    /// The neighbour of `empty` that slides into it when moving this way.
    pub fn source(&self, empty: Cell, size: usize) -> Option<Cell> {
        let (dr, dc) = self.as_offset();

        let row = empty.row as isize + dr;
        let col = empty.col as isize + dc;

        if row >= 0 && row < size as isize && col >= 0 && col < size as isize {
            Some(Cell::new(row as usize, col as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    home: Cell,
    current: Cell,
}

impl Tile {
    pub fn home(&self) -> Cell {
        self.home
    }

    pub fn current(&self) -> Cell {
        self.current
    }

    /// Asset name of the picture shown on this tile.
    pub fn label(&self) -> String {
        format!("Picture{}{}", self.home.row, self.home.col)
    }
}

/// One tile moving a single cell into the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub tile: TileId,
    pub from: Cell,
    pub to: Cell,
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile {} {} -> {}", self.tile.0 + 1, self.from, self.to)
    }
}

/// Cells whose tiles shift into the gap, nearest first, when `tapped` is
/// resolved. Empty unless `tapped` shares exactly one of the gap's row or
/// column.
pub fn slide_sequence(empty: Cell, tapped: Cell) -> Vec<Cell> {
    if tapped.row == empty.row && tapped.col != empty.col {
        steps_between(empty.col, tapped.col)
            .map(|col| Cell::new(empty.row, col))
            .collect()
    } else if tapped.col == empty.col && tapped.row != empty.row {
        steps_between(empty.row, tapped.row)
            .map(|row| Cell::new(row, empty.col))
            .collect()
    } else {
        Vec::new()
    }
}

// Indices from one past `from` up to and including `to`, walking toward `to`.
fn steps_between(from: usize, to: usize) -> Box<dyn Iterator<Item = usize>> {
    if to > from {
        Box::new(from + 1..=to)
    } else {
        Box::new((to..from).rev())
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    slots: Vec<Option<TileId>>,
    tiles: Vec<Tile>,
    empty: Cell,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size * size);
        let mut tiles = Vec::with_capacity(size * size - 1);

        for row in 0..size {
            for col in 0..size {
                if row == size - 1 && col == size - 1 {
                    slots.push(None);
                } else {
                    let home = Cell::new(row, col);
                    slots.push(Some(TileId(tiles.len())));
                    tiles.push(Tile {
                        home,
                        current: home,
                    });
                }
            }
        }

        Self {
            size,
            slots,
            tiles,
            empty: Cell::new(size - 1, size - 1),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn empty(&self) -> Cell {
        self.empty
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| (TileId(i), tile))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    pub fn tile_at(&self, cell: Cell) -> Option<TileId> {
        self.index(cell).and_then(|i| self.slots[i])
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row * self.size + cell.col)
    }

    /// Moves the tile at `cell` into the neighbouring gap. Returns `None`
    /// and leaves the grid untouched if `cell` is not next to the gap.
    pub fn shift_into_empty(&mut self, cell: Cell) -> Option<Slide> {
        if !cell.is_adjacent(self.empty) {
            return None;
        }

        let from = self.index(cell)?;
        let to = self.index(self.empty)?;
        let id = self.slots[from]?;

        self.slots[to] = Some(id);
        self.slots[from] = None;
        self.tiles[id.0].current = self.empty;

        let slide = Slide {
            tile: id,
            from: cell,
            to: self.empty,
        };
        self.empty = cell;
        Some(slide)
    }

    /// Row-major win check: every tile sits on its home cell and the gap is
    /// in the bottom-right corner.
    pub fn is_solved(&self) -> bool {
        for row in 0..self.size {
            for col in 0..self.size {
                let cell = Cell::new(row, col);
                match self.tile_at(cell) {
                    None => {
                        if row != self.size - 1 || col != self.size - 1 {
                            return false;
                        }
                    }
                    Some(id) => {
                        if self.tiles[id.0].home != cell {
                            return false;
                        }
                    }
                }
            }
        }

        true
    }

    /// Tile numbers in row-major order, 0 for the gap.
    fn flattened(&self) -> Vec<usize> {
        self.slots
            .iter()
            .map(|slot| slot.map_or(0, |id| id.0 + 1))
            .collect()
    }

    pub fn is_solvable(&self) -> bool {
        let inversions = Self::count_inversions(&self.flattened());

        if self.size % 2 == 1 {
            // Odd width: solvable if the inversion count is even
            inversions % 2 == 0
        } else {
            // Even width: solvable if (inversions + gap row) is odd
            (inversions + self.empty.row) % 2 == 1
        }
    }

    fn count_inversions(flattened: &[usize]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.flattened().chunks(self.size) {
            for &val in row {
                if val == 0 {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn empty_count(grid: &Grid) -> usize {
        (0..grid.size())
            .flat_map(|row| (0..grid.size()).map(move |col| Cell::new(row, col)))
            .filter(|&cell| grid.tile_at(cell).is_none())
            .count()
    }

    fn apply(grid: &mut Grid, tapped: Cell) -> usize {
        let cells = slide_sequence(grid.empty(), tapped);
        for &cell in &cells {
            grid.shift_into_empty(cell).unwrap();
        }
        cells.len()
    }

    #[test]
    fn setup_places_every_tile_home() {
        let grid = Grid::new(4);

        assert_eq!(grid.tiles().count(), 15);
        assert_eq!(grid.empty(), Cell::new(3, 3));
        assert!(grid.tiles().all(|(_, tile)| tile.home() == tile.current()));
        assert_eq!(grid.tile_at(Cell::new(0, 0)), Some(TileId(0)));
        assert_eq!(grid.tile_at(Cell::new(3, 3)), None);
        assert_eq!(grid.tile(TileId(14)).unwrap().label(), "Picture32");
    }

    #[test]
    fn fresh_grid_is_a_winner() {
        let grid = Grid::new(4);
        assert!(grid.is_solved());
        assert!(grid.is_solvable());
    }

    #[test]
    fn sequence_walks_from_gap_to_tapped_cell() {
        let empty = Cell::new(3, 3);

        assert_eq!(
            slide_sequence(empty, Cell::new(3, 0)),
            vec![Cell::new(3, 2), Cell::new(3, 1), Cell::new(3, 0)]
        );
        assert_eq!(
            slide_sequence(empty, Cell::new(1, 3)),
            vec![Cell::new(2, 3), Cell::new(1, 3)]
        );
        assert_eq!(
            slide_sequence(Cell::new(0, 0), Cell::new(0, 2)),
            vec![Cell::new(0, 1), Cell::new(0, 2)]
        );
    }

    #[test]
    fn sequence_is_empty_off_axis_or_on_gap() {
        let empty = Cell::new(3, 3);

        assert!(slide_sequence(empty, Cell::new(1, 1)).is_empty());
        assert!(slide_sequence(empty, empty).is_empty());
    }

    #[test]
    fn row_tap_at_distance_k_takes_k_steps() {
        let mut grid = Grid::new(4);
        let before = grid.tile_at(Cell::new(3, 1));

        assert_eq!(apply(&mut grid, Cell::new(3, 1)), 2);
        assert_eq!(grid.empty(), Cell::new(3, 1));
        assert_eq!(grid.tile_at(Cell::new(3, 2)), before);
        assert_eq!(grid.tile(before.unwrap()).unwrap().current(), Cell::new(3, 2));
        assert!(!grid.is_solved());
    }

    #[test]
    fn off_axis_tap_leaves_grid_unchanged() {
        let mut grid = Grid::new(4);
        let before = grid.to_string();

        assert_eq!(apply(&mut grid, Cell::new(0, 1)), 0);
        assert_eq!(grid.to_string(), before);
        assert!(grid.is_solved());
    }

    #[test]
    fn shift_rejects_non_adjacent_cells() {
        let mut grid = Grid::new(4);

        assert_eq!(grid.shift_into_empty(Cell::new(3, 1)), None);
        assert_eq!(grid.shift_into_empty(Cell::new(2, 2)), None);
        assert_eq!(grid.shift_into_empty(Cell::new(4, 3)), None);
        assert!(grid.is_solved());
    }

    #[test]
    fn gap_away_from_corner_is_not_solved() {
        let mut grid = Grid::new(4);
        apply(&mut grid, Cell::new(3, 2));
        assert!(!grid.is_solved());

        apply(&mut grid, Cell::new(3, 3));
        assert!(grid.is_solved());
    }

    #[test]
    fn direction_source_respects_edges() {
        let corner = Cell::new(3, 3);

        assert_eq!(Direction::Up.source(corner, 4), None);
        assert_eq!(Direction::Left.source(corner, 4), None);
        assert_eq!(Direction::Down.source(corner, 4), Some(Cell::new(2, 3)));
        assert_eq!(Direction::Right.source(corner, 4), Some(Cell::new(3, 2)));
    }

    #[test]
    fn display_marks_the_gap() {
        let grid = Grid::new(2);
        assert_eq!(grid.to_string(), " 1  2 \n 3  . \n");
    }

    proptest! {
        #[test]
        fn taps_keep_a_single_gap_and_a_solvable_permutation(
            size in 2usize..6,
            taps in prop::collection::vec((0usize..6, 0usize..6), 0..40),
        ) {
            let mut grid = Grid::new(size);

            for (row, col) in taps {
                let tapped = Cell::new(row % size, col % size);
                apply(&mut grid, tapped);

                prop_assert_eq!(empty_count(&grid), 1);
                prop_assert_eq!(grid.tile_at(grid.empty()), None);
                prop_assert!(grid.is_solvable());
                for (id, tile) in grid.tiles() {
                    prop_assert_eq!(grid.tile_at(tile.current()), Some(id));
                }
            }
        }
    }
}
