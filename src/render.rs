use std::fmt;

use crate::{piece::ActivePiece, Board, CellState};

/// What the renderer gets handed: the locked board with the falling piece laid over it.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a, const WIDTH: usize, const HEIGHT: usize> {
    board: &'a Board<WIDTH, HEIGHT>,
    active: Option<&'a ActivePiece>,
}

impl<'a, const WIDTH: usize, const HEIGHT: usize> Frame<'a, WIDTH, HEIGHT> {
    pub fn new(board: &'a Board<WIDTH, HEIGHT>, active: Option<&'a ActivePiece>) -> Self {
        Self { board, active }
    }

    /// The cell as it should be drawn. Out of range reads as empty.
    pub fn cell(&self, col_n: usize, row_n: usize) -> CellState {
        let overlaid = self.active.and_then(|piece| {
            piece
                .cells()
                .any(|cell| cell == (col_n as isize, row_n as isize))
                .then_some(CellState::Occupied(piece.color))
        });
        overlaid.unwrap_or_else(|| self.board.get(col_n, row_n).copied().unwrap_or_default())
    }
}

/// One line per row, `.` for empty cells and the piece letter for occupied ones.
impl<const WIDTH: usize, const HEIGHT: usize> fmt::Display for Frame<'_, WIDTH, HEIGHT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row_n in 0..HEIGHT {
            for col_n in 0..WIDTH {
                let c = match self.cell(col_n, row_n) {
                    CellState::Empty => '.',
                    CellState::Occupied(color) => color.letter(),
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
