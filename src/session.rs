//! Tap and shuffle resolution on top of a [`Grid`].
//!
//! A resolution is planned up front and applied one slide per
//! [`Session::advance`] call, so the caller can finish animating each slide
//! before the next one touches the grid.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::puzzle::{slide_sequence, Cell, Grid, Slide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Resolving,
}

/// Animation speed class of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Slid { slide: Slide, pace: Pace },
    Finished { solved: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Tap,
    Shuffle,
}

impl Resolution {
    fn pace(&self) -> Pace {
        match self {
            Resolution::Tap => Pace::Normal,
            Resolution::Shuffle => Pace::Fast,
        }
    }
}

// Targets are resolved against the gap as it stands when they are reached.
#[derive(Debug, Clone, Copy)]
enum Target {
    Cell(Cell),
    ColumnInGapRow(usize),
    RowInGapColumn(usize),
}

impl Target {
    fn cell(&self, empty: Cell) -> Cell {
        match *self {
            Target::Cell(cell) => cell,
            Target::ColumnInGapRow(col) => Cell::new(empty.row, col),
            Target::RowInGapColumn(row) => Cell::new(row, empty.col),
        }
    }
}

#[derive(Debug)]
struct Plan {
    kind: Resolution,
    targets: VecDeque<Target>,
    pending: VecDeque<Cell>,
}

#[derive(Debug)]
pub struct Session {
    grid: Grid,
    state: SessionState,
    plan: Option<Plan>,
    moves: usize,
    shuffle_rounds: usize,
}

impl Session {
    pub fn new(size: usize) -> Self {
        Self {
            grid: Grid::new(size),
            state: SessionState::Idle,
            plan: None,
            moves: 0,
            shuffle_rounds: 1,
        }
    }

    /// Row/column move pairs made by each shuffle.
    pub fn with_shuffle_rounds(mut self, rounds: usize) -> Self {
        self.shuffle_rounds = rounds.max(1);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Slides made by the player since the last shuffle.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Starts resolving a tap on `cell`. Returns `false` and does nothing if
    /// another resolution is still running or `cell` is the gap.
    pub fn tap(&mut self, cell: Cell) -> bool {
        if !self.is_idle() {
            debug!(%cell, "tap dropped while resolving");
            return false;
        }
        if cell == self.grid.empty() {
            debug!(%cell, "tap on the gap ignored");
            return false;
        }

        info!(%cell, empty = %self.grid.empty(), "tap");
        self.begin(Resolution::Tap, vec![Target::Cell(cell)]);
        true
    }

    /// One row move to a random column of the gap's row, then one column move
    /// to a random row of the gap's new column, repeated once per round.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) -> bool {
        if !self.is_idle() {
            debug!("shuffle dropped while resolving");
            return false;
        }

        let size = self.grid.size();
        let rounds = self.shuffle_rounds;
        let targets = (0..rounds)
            .flat_map(|_| {
                let col = rng.gen_range(0..size);
                let row = rng.gen_range(0..size);
                [Target::ColumnInGapRow(col), Target::RowInGapColumn(row)]
            })
            .collect();

        info!(rounds, "shuffle");
        self.moves = 0;
        self.begin(Resolution::Shuffle, targets);
        true
    }

    fn begin(&mut self, kind: Resolution, targets: Vec<Target>) {
        self.state = SessionState::Resolving;
        self.plan = Some(Plan {
            kind,
            targets: targets.into(),
            pending: VecDeque::new(),
        });
    }

    /// Applies the next slide of the running resolution. Once the plan is
    /// exhausted the win check runs, the session goes back to idle and
    /// `Event::Finished` is returned. Returns `None` while idle.
    pub fn advance(&mut self) -> Option<Event> {
        let plan = self.plan.as_mut()?;

        loop {
            if let Some(cell) = plan.pending.pop_front() {
                match self.grid.shift_into_empty(cell) {
                    Some(slide) => {
                        if plan.kind == Resolution::Tap {
                            self.moves += 1;
                        }
                        let label = self.grid.tile(slide.tile).map(|tile| tile.label());
                        debug!(%slide, ?label, "slid");
                        return Some(Event::Slid {
                            slide,
                            pace: plan.kind.pace(),
                        });
                    }
                    None => {
                        warn!(%cell, empty = %self.grid.empty(), "skipping step not next to the gap");
                        continue;
                    }
                }
            }

            match plan.targets.pop_front() {
                Some(target) => {
                    let empty = self.grid.empty();
                    plan.pending = slide_sequence(empty, target.cell(empty)).into();
                }
                None => break,
            }
        }

        let kind = plan.kind;
        self.plan = None;
        self.state = SessionState::Idle;

        debug_assert!(self.grid.is_solvable());
        let solved = kind == Resolution::Tap && self.grid.is_solved();
        if solved {
            info!(moves = self.moves, "solved");
        }
        Some(Event::Finished { solved })
    }

    /// Drives the running resolution to completion without pausing between
    /// slides.
    pub fn settle(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.advance()).collect()
    }
}
