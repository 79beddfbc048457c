use std::time::Duration;

use static_assertions::const_assert;
use strum::{Display, EnumString};
use tracing::{debug, info, trace, warn};

use crate::{
    piece::{ActivePiece, Tetromino},
    render::Frame,
    timer::DropTimer,
    Board, CellState,
};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;

// an I piece must be able to spawn flat, and an upright one must fit
const_assert!(COLS >= 4 && ROWS >= 4);

/// The reference 10 * 20 game.
pub type StandardSession<S> = Session<COLS, ROWS, S>;

/// Scoring and speed knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Drop cadence at level 1. Level `n` drops every `base_interval / n`.
    pub base_interval: Duration,
    /// Per cleared row, multiplied by the level the clear happened at.
    pub points_per_line: u32,
    /// Level `n` is left once the score reaches `n * points_per_level`.
    pub points_per_level: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(1000),
            points_per_line: 100,
            points_per_level: 500,
        }
    }
}

impl Rules {
    pub fn cadence(&self, level: u32) -> Duration {
        self.base_interval / level.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    /// Soft drop. Never locks the piece.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// (Re)start. Ignored while a game is running.
    Start,
    Tick,
    Move(Direction),
    Rotate,
    HardDrop,
    /// End a running game early.
    Abort,
}

/// Keyboard keys the game responds to, by their browser key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowDown,
    ArrowUp,
    #[strum(serialize = " ")]
    Space,
}

impl From<Key> for Command {
    fn from(key: Key) -> Self {
        match key {
            Key::ArrowLeft => Command::Move(Direction::Left),
            Key::ArrowRight => Command::Move(Direction::Right),
            Key::ArrowDown => Command::Move(Direction::Down),
            Key::ArrowUp => Command::Rotate,
            Key::Space => Command::HardDrop,
        }
    }
}

/// One game: the board, the falling piece, score, level and drop cadence.
///
/// Pieces are drawn from `S`. If it runs dry the game is over.
#[derive(Debug, Clone)]
pub struct Session<const WIDTH: usize, const HEIGHT: usize, S> {
    board: Board<WIDTH, HEIGHT>,
    active: Option<ActivePiece>,
    score: u32,
    level: u32,
    lines: u32,
    phase: Phase,
    timer: DropTimer,
    rules: Rules,
    source: S,
}

impl<const WIDTH: usize, const HEIGHT: usize, S> Session<WIDTH, HEIGHT, S>
where
    S: Iterator<Item = Tetromino>,
{
    pub fn new(source: S) -> Self {
        Self::with_rules(source, Rules::default())
    }

    pub fn with_rules(source: S, rules: Rules) -> Self {
        Self {
            board: Board::default(),
            active: None,
            score: 0,
            level: 1,
            lines: 0,
            phase: Phase::NotStarted,
            timer: DropTimer::default(),
            rules,
            source,
        }
    }

    pub fn board(&self) -> &Board<WIDTH, HEIGHT> {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Rows cleared since the game started.
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time between automatic drops, or `None` while no game is running.
    pub fn cadence(&self) -> Option<Duration> {
        self.timer.interval()
    }

    pub fn frame(&self) -> Frame<'_, WIDTH, HEIGHT> {
        Frame::new(&self.board, self.active.as_ref())
    }

    /// Let up to `budget` of time pass on the drop timer.
    /// See [DropTimer::advance]: a `Some` means a [Command::Tick] is due.
    pub fn advance_timer(&mut self, budget: Duration) -> Option<Duration> {
        self.timer.advance(budget)
    }

    pub fn apply(mut self, command: Command) -> Self {
        self.handle(command);
        self
    }

    pub fn handle(&mut self, command: Command) {
        match (self.phase, command) {
            (Phase::NotStarted | Phase::GameOver, Command::Start) => self.start(),
            (Phase::Running, Command::Tick) => self.step_down(),
            (Phase::Running, Command::Move(direction)) => self.shift(direction),
            (Phase::Running, Command::Rotate) => self.rotate(),
            (Phase::Running, Command::HardDrop) => self.hard_drop(),
            (Phase::Running, Command::Abort) => self.end(),
            (phase, command) => trace!(%phase, ?command, "ignored"),
        }
    }

    fn start(&mut self) {
        self.board = Board::default();
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.phase = Phase::Running;
        self.timer.arm(self.rules.cadence(self.level));
        info!(cadence = ?self.rules.cadence(self.level), "game started");
        self.spawn();
    }

    fn end(&mut self) {
        self.phase = Phase::GameOver;
        self.timer.stop();
        info!(score = self.score, level = self.level, "game over");
    }

    /// Commit `candidate` as the active piece if it fits.
    fn try_place(&mut self, candidate: ActivePiece) -> bool {
        match self
            .board
            .check_placement(&candidate.shape, candidate.x, candidate.y)
        {
            Ok(()) => {
                self.active = Some(candidate);
                true
            }
            Err(reason) => {
                trace!(%reason, "rejected");
                false
            }
        }
    }

    fn shift(&mut self, direction: Direction) {
        let Some(piece) = &self.active else { return };
        let candidate = match direction {
            Direction::Left => piece.moved(-1, 0),
            Direction::Right => piece.moved(1, 0),
            Direction::Down => piece.moved(0, 1),
        };
        self.try_place(candidate);
    }

    fn rotate(&mut self) {
        let Some(piece) = &self.active else { return };
        let candidate = piece.rotated();
        self.try_place(candidate);
    }

    fn step_down(&mut self) {
        let Some(piece) = &self.active else { return };
        let candidate = piece.moved(0, 1);
        if !self.try_place(candidate) {
            self.lock();
            self.clear_lines();
            self.spawn();
        }
    }

    fn hard_drop(&mut self) {
        let Some(mut piece) = self.active.take() else { return };
        while self.board.is_valid_move(&piece.shape, piece.x, piece.y + 1) {
            piece.y += 1;
        }
        self.active = Some(piece);
        self.step_down();
    }

    fn lock(&mut self) {
        if let Some(piece) = self.active.take() {
            debug!(x = piece.x, y = piece.y, color = %piece.color, "locked");
            self.board.stamp(
                &piece.shape,
                piece.x,
                piece.y,
                CellState::Occupied(piece.color),
            );
        }
    }

    fn clear_lines(&mut self) {
        let cleared = self.board.clear_full_rows() as u32;
        if cleared == 0 {
            return;
        }
        self.lines = self.lines.saturating_add(cleared);
        self.score = cleared
            .saturating_mul(self.rules.points_per_line)
            .saturating_mul(self.level)
            .saturating_add(self.score);
        debug!(cleared, score = self.score, "cleared");
        // one level per clear, however many thresholds the score jumped
        if self.score >= self.level.saturating_mul(self.rules.points_per_level) {
            self.level += 1;
            let cadence = self.rules.cadence(self.level);
            self.timer.arm(cadence);
            info!(level = self.level, ?cadence, "level up");
        }
    }

    fn spawn(&mut self) {
        let Some(kind) = self.source.next() else {
            warn!("out of pieces");
            self.end();
            return;
        };
        let piece = ActivePiece::spawn(kind, WIDTH);
        let fits = self.board.check_placement(&piece.shape, piece.x, piece.y);
        debug!(%kind, x = piece.x, "spawned");
        self.active = Some(piece);
        if let Err(reason) = fits {
            info!(%reason, "no room to spawn");
            self.end();
        }
    }
}
