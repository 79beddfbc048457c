use std::{str::FromStr, time::Duration};

use derive_more::Display;
use tracing::trace;

use crate::{
    piece::Tetromino,
    render::Frame,
    session::{Command, Key, Phase, Session},
};

/// What the display hears about, besides redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Event {
    #[display(fmt = "score: {}", _0)]
    Score(u32),
    #[display(fmt = "level: {}", _0)]
    Level(u32),
    #[display(fmt = "game over! score: {}", final_score)]
    GameOver { final_score: u32 },
    /// Whether (re)starting is currently allowed.
    #[display(fmt = "start enabled: {}", _0)]
    StartControl(bool),
}

/// The rendering and display side of the game.
pub trait Ui<const WIDTH: usize, const HEIGHT: usize> {
    /// Redraw everything. Called after every command, whether or not it changed anything.
    fn draw(&mut self, frame: &Frame<'_, WIDTH, HEIGHT>);

    fn notify(&mut self, _event: Event) {}
}

/// Feeds commands, keys and the passage of time into a [Session],
/// keeping a [Ui] up to date.
#[derive(Debug)]
pub struct Game<const WIDTH: usize, const HEIGHT: usize, S, U> {
    session: Session<WIDTH, HEIGHT, S>,
    ui: U,
}

impl<const WIDTH: usize, const HEIGHT: usize, S, U> Game<WIDTH, HEIGHT, S, U>
where
    S: Iterator<Item = Tetromino>,
    U: Ui<WIDTH, HEIGHT>,
{
    pub fn new(session: Session<WIDTH, HEIGHT, S>, mut ui: U) -> Self {
        ui.draw(&session.frame());
        ui.notify(Event::StartControl(session.phase() != Phase::Running));
        Self { session, ui }
    }

    pub fn session(&self) -> &Session<WIDTH, HEIGHT, S> {
        &self.session
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn into_parts(self) -> (Session<WIDTH, HEIGHT, S>, U) {
        (self.session, self.ui)
    }

    pub fn send(&mut self, command: Command) {
        let (score, level, phase) = (
            self.session.score(),
            self.session.level(),
            self.session.phase(),
        );
        self.session.handle(command);
        self.ui.draw(&self.session.frame());

        if self.session.score() != score {
            self.ui.notify(Event::Score(self.session.score()));
        }
        if self.session.level() != level {
            self.ui.notify(Event::Level(self.session.level()));
        }
        match (phase, self.session.phase()) {
            (before, Phase::Running) if before != Phase::Running => {
                self.ui.notify(Event::StartControl(false));
            }
            (Phase::Running, Phase::GameOver) => {
                self.ui.notify(Event::GameOver {
                    final_score: self.session.score(),
                });
                self.ui.notify(Event::StartControl(true));
            }
            _ => (),
        }
    }

    /// Handle a raw key press. Keys with no binding only cause a redraw.
    pub fn key(&mut self, key: &str) {
        match Key::from_str(key) {
            Ok(key) => self.send(key.into()),
            Err(_) => {
                trace!(key, "unbound key");
                self.ui.draw(&self.session.frame());
            }
        }
    }

    /// Let `elapsed` pass, ticking once per drop interval.
    /// Returns the number of ticks.
    pub fn elapse(&mut self, elapsed: Duration) -> u32 {
        let mut remaining = elapsed;
        let mut ticks = 0;
        while let Some(rest) = self.session.advance_timer(remaining) {
            remaining = rest;
            ticks += 1;
            self.send(Command::Tick);
        }
        ticks
    }
}
