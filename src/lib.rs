use array_macro::array;

pub mod game;
pub mod piece;
pub mod render;
pub mod session;
pub mod timer;

pub use game::{Event, Game, Ui};
pub use piece::{ActivePiece, Catalog, Color, Shape, Tetromino};
pub use render::Frame;
pub use session::{Command, Direction, Key, Phase, Rules, Session, StandardSession, COLS, ROWS};
pub use timer::DropTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
// choice: static array, not hashmap of coords, the board never changes size
// choice: row-wise, because we'll be searching and clearing rows
// choice: generic CellT, the engine only cares about default (empty) vs not
pub struct Grid<const WIDTH: usize, const HEIGHT: usize, CellT> {
    rows: [[CellT; WIDTH]; HEIGHT],
}

/// The playfield: every cell is either empty or holds the color of a locked piece.
pub type Board<const WIDTH: usize, const HEIGHT: usize> = Grid<WIDTH, HEIGHT, CellState>;

impl<const WIDTH: usize, const HEIGHT: usize, CellT> Grid<WIDTH, HEIGHT, CellT> {
    pub const fn from_rows(rows: [[CellT; WIDTH]; HEIGHT]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[CellT; WIDTH]; HEIGHT] {
        &self.rows
    }

    pub fn get(&self, col_n: usize, row_n: usize) -> Option<&CellT> {
        self.rows.get(row_n)?.get(col_n)
    }

    pub fn get_mut(&mut self, col_n: usize, row_n: usize) -> Option<&mut CellT> {
        self.rows.get_mut(row_n)?.get_mut(col_n)
    }

    fn cell_mut(&mut self, col_n: isize, row_n: isize) -> Option<&mut CellT> {
        let col_n = usize::try_from(col_n).ok()?;
        let row_n = usize::try_from(row_n).ok()?;
        self.get_mut(col_n, row_n)
    }
}

impl<const WIDTH: usize, const HEIGHT: usize, CellT> Grid<WIDTH, HEIGHT, CellT>
where
    CellT: Default + Clone,
{
    fn empty_row() -> [CellT; WIDTH] {
        array![CellT::default(); WIDTH]
    }

    /// Delete `row_n` and push a fresh empty row in at the top.
    /// Rows above `row_n` move down by one, rows below stay put.
    pub fn remove_row(&mut self, row_n: usize) {
        if row_n < HEIGHT {
            self.rows[..=row_n].rotate_right(1);
            self.rows[0] = Self::empty_row();
        }
    }
}

impl<const WIDTH: usize, const HEIGHT: usize, CellT> Default for Grid<WIDTH, HEIGHT, CellT>
where
    CellT: Default + Clone,
{
    fn default() -> Self {
        Self {
            rows: array![Self::empty_row(); HEIGHT],
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum Collision {
    #[error("cell at row {row_n}, column {col_n} is outside the grid")]
    OutOfBounds { row_n: isize, col_n: isize },
    #[error("would clobber non-default cell at row {row_n}, column {col_n} (this is the first clobber, there may be more)")]
    WouldClobber { row_n: usize, col_n: usize },
}

fn is_default<T: Default + PartialEq>(t: &T) -> bool {
    t == &T::default()
}

impl<const WIDTH: usize, const HEIGHT: usize, CellT> Grid<WIDTH, HEIGHT, CellT>
where
    CellT: Default + Clone + PartialEq,
{
    /// Check whether `shape`, with its bounding box's top-left at (`x`, `y`), fits.
    ///
    /// Cells left of, right of, or below the grid collide. Cells above the top
    /// edge are allowed, and are never checked against the grid's contents.
    pub fn check_placement(&self, shape: &Shape, x: isize, y: isize) -> Result<(), Collision> {
        for (r, c) in shape.occupied() {
            let (col_n, row_n) = (x + c as isize, y + r as isize);
            if col_n < 0 || col_n >= WIDTH as isize || row_n >= HEIGHT as isize {
                return Err(Collision::OutOfBounds { row_n, col_n });
            }
            if row_n < 0 {
                continue;
            }
            let (col_n, row_n) = (col_n as usize, row_n as usize);
            if !is_default(&self.rows[row_n][col_n]) {
                return Err(Collision::WouldClobber { row_n, col_n });
            }
        }
        Ok(())
    }

    pub fn is_valid_move(&self, shape: &Shape, x: isize, y: isize) -> bool {
        self.check_placement(shape, x, y).is_ok()
    }

    /// Write `cell` under every occupied cell of `shape`.
    /// Parts of the shape that hang off the grid are dropped.
    pub fn stamp(&mut self, shape: &Shape, x: isize, y: isize, cell: CellT) {
        for (r, c) in shape.occupied() {
            if let Some(dest) = self.cell_mut(x + c as isize, y + r as isize) {
                *dest = cell.clone();
            }
        }
    }

    pub fn is_row_full(&self, row_n: usize) -> bool {
        WIDTH > 0
            && self
                .rows
                .get(row_n)
                .map_or(false, |row| row.iter().all(|cell| !is_default(cell)))
    }

    /// Remove every full row, scanning bottom to top, and return how many went.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut row_n = HEIGHT;
        while row_n > 0 {
            // a removal pulls the row above into this slot, so look at it again
            if self.is_row_full(row_n - 1) {
                self.remove_row(row_n - 1);
                cleared += 1;
            } else {
                row_n -= 1;
            }
        }
        cleared
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    Occupied(Color),
}

impl CellState {
    pub fn is_occupied(&self) -> bool {
        matches!(self, CellState::Occupied(_))
    }
}

/// Build a [Grid] of [CellState] from rows of `.` (empty) and piece letters,
/// each letter standing for its piece's color.
#[macro_export]
macro_rules! grid {
    ($([$($cell:tt)* $(,)?]),* $(,)?) => {
        $crate::Grid::from_rows(
            [ // begin grid
                $([ // begin row
                    $(
                        $crate::grid!(@cell $cell),
                    )*
                ]),* // end row
            ] // end grid
        )
    };
    (@cell .) => {
        $crate::CellState::Empty
    };
    (@cell I) => {
        $crate::CellState::Occupied($crate::Color::Cyan)
    };
    (@cell J) => {
        $crate::CellState::Occupied($crate::Color::Blue)
    };
    (@cell L) => {
        $crate::CellState::Occupied($crate::Color::Orange)
    };
    (@cell O) => {
        $crate::CellState::Occupied($crate::Color::Yellow)
    };
    (@cell S) => {
        $crate::CellState::Occupied($crate::Color::Green)
    };
    (@cell T) => {
        $crate::CellState::Occupied($crate::Color::Purple)
    };
    (@cell Z) => {
        $crate::CellState::Occupied($crate::Color::Red)
    };
}
