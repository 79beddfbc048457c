use std::{io, str::FromStr, time::Duration};

use anyhow::Context;
use clap::Parser;
use derive_more::From;
use rand::{rngs::StdRng, SeedableRng};
use recap::Recap;
use serde::Deserialize;
use tap::Pipe;
use tetris_engine::{
    Catalog, Command, Direction, Event, Frame, Game, Rules, StandardSession, Tetromino, Ui, COLS,
    ROWS,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about, override_usage = "tetris-engine [OPTIONS] < script.txt")]
struct Args {
    /// Seed for the random piece choice. Random if not given.
    #[arg(long)]
    seed: Option<u64>,
    /// Play this piece sequence over and over instead of random pieces, e.g. `OITL`.
    #[arg(long, value_parser = parse_pieces)]
    pieces: Option<PieceSequence>,
    /// Print the final board of each game.
    #[arg(long)]
    board: bool,
    /// Print score, level and game over notifications as they happen.
    #[arg(short, long)]
    verbose: bool,
    /// Drop interval at level 1, in milliseconds.
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,
    /// Points per cleared row, before the level multiplier.
    #[arg(long, default_value_t = 100)]
    line_points: u32,
    /// Points needed per level to reach the next one.
    #[arg(long, default_value_t = 500)]
    level_points: u32,
}

impl Args {
    fn rules(&self) -> Rules {
        Rules {
            base_interval: Duration::from_millis(self.interval_ms),
            points_per_line: self.line_points,
            points_per_level: self.level_points,
        }
    }

    fn pieces(&self, seed: u64) -> Box<dyn Iterator<Item = Tetromino>> {
        match &self.pieces {
            Some(PieceSequence(pieces)) => Box::new(pieces.clone().into_iter().cycle()),
            None => Box::new(Catalog::new(StdRng::seed_from_u64(seed))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, From)]
struct PieceSequence(Vec<Tetromino>);

fn parse_pieces(s: &str) -> anyhow::Result<PieceSequence> {
    anyhow::ensure!(!s.is_empty(), "piece sequence is empty");
    s.chars()
        .map(|c| {
            Tetromino::from_str(&c.to_string()).with_context(|| format!("no such piece {c:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map(PieceSequence::from)
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum Action {
    Start,
    Tick,
    Left,
    Right,
    Down,
    Rotate,
    Drop,
    Abort,
    /// Let the drop timer run for COUNT milliseconds.
    Wait,
}

#[derive(Debug, Deserialize, Recap, PartialEq, Eq, Clone, Copy)]
#[recap(regex = r#"^(?P<action>[a-z]+)(?:\*(?P<count>\d+))?$"#)]
struct Step {
    action: Action,
    count: Option<u64>,
}

fn parse_line(s: &str) -> anyhow::Result<Vec<Step>> {
    Ok(s.split(',')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(|step| Step::from_str(step).with_context(|| format!("bad step {step:?}")))
        .collect::<Result<Vec<_>, _>>()?)
}

/// Remembers the latest frame, optionally echoing events to stdout.
#[derive(Debug, Default)]
struct Printer {
    verbose: bool,
    last_frame: String,
}

impl<const WIDTH: usize, const HEIGHT: usize> Ui<WIDTH, HEIGHT> for Printer {
    fn draw(&mut self, frame: &Frame<'_, WIDTH, HEIGHT>) {
        self.last_frame = frame.to_string();
    }

    fn notify(&mut self, event: Event) {
        if self.verbose {
            println!("{event}");
        }
    }
}

fn play<S: Iterator<Item = Tetromino>, U: Ui<COLS, ROWS>>(
    game: &mut Game<COLS, ROWS, S, U>,
    steps: impl IntoIterator<Item = Step>,
) {
    for Step { action, count } in steps {
        let command = match action {
            Action::Wait => {
                game.elapse(Duration::from_millis(count.unwrap_or(0)));
                continue;
            }
            Action::Start => Command::Start,
            Action::Tick => Command::Tick,
            Action::Left => Command::Move(Direction::Left),
            Action::Right => Command::Move(Direction::Right),
            Action::Down => Command::Move(Direction::Down),
            Action::Rotate => Command::Rotate,
            Action::Drop => Command::HardDrop,
            Action::Abort => Command::Abort,
        };
        for _ in 0..count.unwrap_or(1) {
            game.send(command);
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "piece seed");

    for line in io::stdin().lines() {
        let steps = parse_line(&line.context("couldn't read line from stdin")?)
            .context("couldn't parse line")?;
        let mut game = StandardSession::with_rules(args.pieces(seed), args.rules())
            .pipe(|session| {
                Game::new(
                    session,
                    Printer {
                        verbose: args.verbose,
                        ..Default::default()
                    },
                )
            });
        play(&mut game, steps);

        let (session, printer) = game.into_parts();
        if args.board {
            print!("{}", printer.last_frame);
        }
        println!(
            "score={} level={} state={}",
            session.score(),
            session.level(),
            session.phase()
        );
    }
    Ok(())
}
