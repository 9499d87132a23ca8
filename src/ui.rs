//! Terminal front end: input binding, slide animation and the panel.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{self, MoveTo};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as InputEvent, KeyCode, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::layout::{Layout, SHUFFLE_LABEL};
use crate::picture::TilePictures;
use crate::puzzle::{Direction, Slide};
use crate::render::paint_board;
use crate::session::{Event, Session, SessionState};

const FRAME: Duration = Duration::from_millis(16);

const WINNER_BOX: [&str; 5] = [
    "┌──────────────┐",
    "│  Congrats!   │",
    "│    Winner    │",
    "│    [ OK ]    │",
    "└──────────────┘",
];

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Click { column: u16, row: u16 },
    Slide(Direction),
    Shuffle,
    Dismiss,
    Resize(u16, u16),
    Quit,
    Ignore,
}

fn action(event: &InputEvent) -> Action {
    match event {
        InputEvent::Key(key) => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('s') => Action::Shuffle,
            KeyCode::Up => Action::Slide(Direction::Up),
            KeyCode::Down => Action::Slide(Direction::Down),
            KeyCode::Left => Action::Slide(Direction::Left),
            KeyCode::Right => Action::Slide(Direction::Right),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Action::Dismiss,
            _ => Action::Ignore,
        },
        InputEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Action::Click {
                column: mouse.column,
                row: mouse.row,
            }
        }
        InputEvent::Resize(columns, rows) => Action::Resize(*columns, *rows),
        _ => Action::Ignore,
    }
}

struct App<'a> {
    config: &'a Config,
    session: Session,
    pictures: TilePictures,
    layout: Option<Layout>,
    rng: StdRng,
    winner: bool,
    quit: bool,
    needs_clear: bool,
}

pub fn run(config: &Config, rng: StdRng) -> Result<()> {
    let session = Session::new(config.size).with_shuffle_rounds(config.shuffle_rounds);
    let pictures = TilePictures::load(&config.pictures, session.grid())?;

    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;

    let mut app = App::new(config, session, pictures, rng);
    let (columns, rows) = terminal::size()?;
    app.relayout(columns, rows);

    while !app.quit {
        app.draw(&mut out, None)?;
        let input = event::read()?;
        app.apply(action(&input));
        app.resolve(&mut out)?;
    }

    info!(moves = app.session.moves(), "quit");
    Ok(())
}

impl<'a> App<'a> {
    fn new(config: &'a Config, session: Session, pictures: TilePictures, rng: StdRng) -> Self {
        Self {
            config,
            session,
            pictures,
            layout: None,
            rng,
            winner: false,
            quit: false,
            needs_clear: true,
        }
    }

    fn relayout(&mut self, columns: u16, rows: u16) {
        self.layout = Layout::compute(columns, rows, self.config.size);
        match &self.layout {
            Some(layout) => {
                self.pictures.rescale(layout.picture_size() as u32);
                debug!(
                    columns,
                    rows,
                    orientation = ?layout.orientation,
                    tile_size = layout.tile_size,
                    "relayout"
                );
            }
            None => debug!(columns, rows, "terminal too small for the board"),
        }
        self.needs_clear = true;
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit = true,
            Action::Resize(columns, rows) => self.relayout(columns, rows),
            Action::Ignore => {}
            _ if self.winner => {
                if matches!(action, Action::Dismiss | Action::Click { .. }) {
                    self.winner = false;
                    self.needs_clear = true;
                }
            }
            Action::Dismiss => {}
            Action::Shuffle => {
                self.session.shuffle(&mut self.rng);
            }
            Action::Slide(direction) => {
                let grid = self.session.grid();
                if let Some(cell) = direction.source(grid.empty(), grid.size()) {
                    debug!(%direction, %cell, "arrow");
                    self.session.tap(cell);
                }
            }
            Action::Click { column, row } => {
                let Some(layout) = self.layout else {
                    return;
                };
                if layout.shuffle_button().contains(column, row) {
                    self.session.shuffle(&mut self.rng);
                } else if let Some(cell) = layout.hit_test(column, row) {
                    self.session.tap(cell);
                }
            }
        }
    }

    /// Plays the running resolution one slide at a time. Input that arrives
    /// meanwhile is still applied, so quitting and resizing work, but the
    /// session drops taps and shuffles until it is idle again.
    fn resolve<W: Write>(&mut self, out: &mut W) -> Result<()> {
        while let Some(event) = self.session.advance() {
            match event {
                Event::Slid { slide, pace } => {
                    self.animate(out, slide, self.config.duration(pace))?;
                }
                Event::Finished { solved } => {
                    if solved {
                        self.winner = true;
                    }
                }
            }
        }
        Ok(())
    }

    fn animate<W: Write>(&mut self, out: &mut W, slide: Slide, duration: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            let progress = start.elapsed().as_secs_f32() / duration.as_secs_f32();
            self.draw(out, Some((slide, progress)))?;
            if progress >= 1.0 {
                return Ok(());
            }
            if event::poll(FRAME)? {
                let input = event::read()?;
                self.apply(action(&input));
            }
        }
    }

    fn draw<W: Write>(&mut self, out: &mut W, sliding: Option<(Slide, f32)>) -> Result<()> {
        if self.needs_clear {
            queue!(out, Clear(ClearType::All))?;
            self.needs_clear = false;
        }

        let Some(layout) = self.layout else {
            queue!(
                out,
                MoveTo(0, 0),
                Print("Enlarge the terminal to show the puzzle")
            )?;
            out.flush()?;
            return Ok(());
        };

        paint_board(self.session.grid(), &self.pictures, &layout, sliding).flush(out, (0, 0))?;
        self.draw_panel(out, &layout)?;
        if self.winner {
            draw_winner(out, &layout)?;
        }
        out.flush()?;
        Ok(())
    }

    fn draw_panel<W: Write>(&self, out: &mut W, layout: &Layout) -> io::Result<()> {
        let (x, y) = layout.panel;
        let button = layout.shuffle_button();

        queue!(
            out,
            MoveTo(x, y),
            SetAttribute(Attribute::Bold),
            Print("Picture Slide"),
            SetAttribute(Attribute::Reset),
            MoveTo(x, y + 1),
            Print(format!("Moves: {:<6}", self.session.moves())),
            MoveTo(button.x, button.y),
        )?;

        if self.session.state() == SessionState::Idle && !self.winner {
            queue!(out, SetAttribute(Attribute::Reverse), Print(SHUFFLE_LABEL))?;
        } else {
            queue!(out, SetAttribute(Attribute::Dim), Print(SHUFFLE_LABEL))?;
        }

        queue!(
            out,
            SetAttribute(Attribute::Reset),
            MoveTo(x, y + 3),
            Print("s shuffle  q quit")
        )
    }
}

/// Top-left terminal cell of the winner box: centred on the board, or at the
/// panel origin when the board is narrower than the box.
fn winner_origin(layout: &Layout) -> (u16, u16) {
    let board = layout.board();
    let width = WINNER_BOX[0].chars().count() as u16;
    if board.width < width {
        return layout.panel;
    }

    let x = (board.width / 2)
        .saturating_sub(width / 2)
        .min(board.width - width);
    let y = (board.height / 4).saturating_sub(WINNER_BOX.len() as u16 / 2);
    (x, y)
}

fn draw_winner<W: Write>(out: &mut W, layout: &Layout) -> io::Result<()> {
    let (x, y) = winner_origin(layout);

    queue!(out, SetAttribute(Attribute::Bold))?;
    for (i, line) in WINNER_BOX.iter().enumerate() {
        queue!(out, MoveTo(x, y + i as u16), Print(line))?;
    }
    queue!(out, SetAttribute(Attribute::Reset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::{KeyEvent, MouseEvent};
    use rand::SeedableRng;

    use crate::config::Args;
    use crate::picture::PictureSource;
    use crate::puzzle::Cell;

    fn config() -> Config {
        Config::from_args(Args::parse_from(["picture-slide"])).unwrap()
    }

    fn app(config: &Config) -> App<'_> {
        let session = Session::new(config.size);
        let pictures = TilePictures::load(&PictureSource::Generated, session.grid()).unwrap();
        let mut app = App::new(config, session, pictures, StdRng::seed_from_u64(7));
        app.relayout(120, 40);
        app
    }

    fn click(column: u16, row: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keys_and_clicks_map_to_actions() {
        assert_eq!(action(&key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            action(&InputEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))),
            Action::Quit
        );
        assert_eq!(action(&key(KeyCode::Char('s'))), Action::Shuffle);
        assert_eq!(action(&key(KeyCode::Left)), Action::Slide(Direction::Left));
        assert_eq!(action(&key(KeyCode::Enter)), Action::Dismiss);
        assert_eq!(action(&click(3, 4)), Action::Click { column: 3, row: 4 });
        assert_eq!(action(&InputEvent::Resize(80, 24)), Action::Resize(80, 24));
        assert_eq!(action(&key(KeyCode::Char('x'))), Action::Ignore);
    }

    #[test]
    fn clicking_a_tile_taps_it() {
        let config = config();
        let mut app = app(&config);

        // (0, 3) on a 20 pixel tile grid
        app.apply(action(&click(65, 5)));
        assert!(!app.session.is_idle());
        app.session.settle();
        assert_eq!(app.session.grid().empty(), Cell::new(0, 3));
    }

    #[test]
    fn arrow_moves_the_neighbour_into_the_gap() {
        let config = config();
        let mut app = app(&config);

        app.apply(Action::Slide(Direction::Right));
        app.session.settle();
        assert_eq!(app.session.grid().empty(), Cell::new(3, 2));

        app.apply(Action::Slide(Direction::Up));
        assert!(app.session.is_idle());
    }

    #[test]
    fn shuffle_button_starts_a_shuffle() {
        let config = config();
        let mut app = app(&config);
        let button = app.layout.unwrap().shuffle_button();

        app.apply(action(&click(button.x + 1, button.y)));
        let events = app.session.settle();
        assert_eq!(events.last(), Some(&Event::Finished { solved: false }));
    }

    #[test]
    fn winner_notice_blocks_board_until_dismissed() {
        let config = config();
        let mut app = app(&config);
        app.winner = true;

        app.apply(Action::Slide(Direction::Right));
        app.apply(Action::Shuffle);
        assert!(app.session.is_idle());
        assert!(app.winner);

        app.apply(Action::Dismiss);
        assert!(!app.winner);

        app.winner = true;
        app.apply(action(&click(65, 5)));
        assert!(!app.winner);
        assert!(app.session.is_idle());
    }

    #[test]
    fn clicking_the_gap_on_a_solved_board_shows_no_winner() {
        let config = config();
        let mut app = app(&config);

        // (3, 3) on a 20 pixel tile grid
        app.apply(action(&click(65, 35)));
        assert!(app.session.is_idle());
        assert_eq!(app.session.advance(), None);
        assert!(!app.winner);
    }

    #[test]
    fn winner_box_stays_on_a_wide_board() {
        let layout = Layout::compute(120, 40, 4).unwrap();
        let width = WINNER_BOX[0].chars().count() as u16;
        let (x, _) = winner_origin(&layout);

        assert!(x + width <= layout.board().width);
    }

    #[test]
    fn winner_box_moves_to_panel_on_a_narrow_board() {
        let layout = Layout::compute(40, 6, 4).unwrap();
        assert_eq!(layout.tile_size, 3);

        let (x, y) = winner_origin(&layout);
        assert_eq!((x, y), layout.panel);
        assert!(x >= layout.board().width + 2);
    }

    #[test]
    fn small_terminal_drops_layout() {
        let config = config();
        let mut app = app(&config);

        app.apply(Action::Resize(10, 5));
        assert!(app.layout.is_none());
        app.apply(action(&click(1, 1)));
        assert!(app.session.is_idle());

        let mut out = Vec::new();
        app.draw(&mut out, None).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("Enlarge"));
    }
}
