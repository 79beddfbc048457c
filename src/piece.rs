use rand::Rng;
use static_assertions::const_assert_eq;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

impl Color {
    /// The letter of the tetromino that carries this color, used for text output.
    pub fn letter(self) -> char {
        match self {
            Color::Cyan => 'I',
            Color::Blue => 'J',
            Color::Orange => 'L',
            Color::Yellow => 'O',
            Color::Green => 'S',
            Color::Purple => 'T',
            Color::Red => 'Z',
        }
    }
}

#[derive(Debug, EnumString, Display, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Tetromino {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

const_assert_eq!(Tetromino::ALL.len(), 7);

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::T,
        Tetromino::Z,
    ];

    pub fn color(self) -> Color {
        match self {
            Tetromino::I => Color::Cyan,
            Tetromino::J => Color::Blue,
            Tetromino::L => Color::Orange,
            Tetromino::O => Color::Yellow,
            Tetromino::S => Color::Green,
            Tetromino::T => Color::Purple,
            Tetromino::Z => Color::Red,
        }
    }

    /// A fresh copy of this piece's spawn orientation.
    pub fn shape(self) -> Shape {
        let bits: &[&[u8]] = match self {
            Tetromino::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        };
        Shape::from_bits(bits)
    }
}

/// A rectangular occupancy matrix, indexed `[row][column]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Rows with no columns make an empty shape.
    ///
    /// # Panics
    /// - If the rows aren't all the same length
    pub fn from_bits(rows: &[&[u8]]) -> Self {
        if rows.iter().all(|row| row.is_empty()) {
            return Self::default();
        }
        let shape = Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|bit| *bit != 0).collect())
                .collect(),
        };
        assert!(
            shape.rows.iter().all(|row| row.len() == shape.width()),
            "shape must be rectangular"
        );
        shape
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// `(row, column)` of every occupied cell, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(c, _)| (r, c))
        })
    }

    /// Rotate a quarter turn clockwise about the bounding box.
    /// An N-row, M-column shape becomes M rows of N columns.
    pub fn rotate(&self) -> Shape {
        let n = self.height();
        let mut rows = vec![vec![false; n]; self.width()];
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                rows[c][n - 1 - r] = *cell;
            }
        }
        Shape { rows }
    }
}

/// The falling piece. Its position is the top-left of the shape's bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub shape: Shape,
    pub color: Color,
    pub x: isize,
    pub y: isize,
}

impl ActivePiece {
    /// Place `kind` on the top row, horizontally centered on a board `cols` wide.
    pub fn spawn(kind: Tetromino, cols: usize) -> Self {
        let shape = kind.shape();
        let x = (cols / 2) as isize - (shape.width() / 2) as isize;
        Self {
            shape,
            color: kind.color(),
            x,
            y: 0,
        }
    }

    pub fn moved(&self, dx: isize, dy: isize) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotate(),
            ..self.clone()
        }
    }

    /// Board coordinates `(column, row)` of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        self.shape
            .occupied()
            .map(|(r, c)| (self.x + c as isize, self.y + r as isize))
    }
}

/// Endless uniformly random pieces.
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    rng: R,
}

impl<R: Rng> Catalog<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Iterator for Catalog<R> {
    type Item = Tetromino;

    fn next(&mut self) -> Option<Self::Item> {
        Some(Tetromino::ALL[self.rng.gen_range(0..Tetromino::ALL.len())])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn templates_fit_their_boxes() {
        for kind in Tetromino::ALL {
            let shape = kind.shape();
            assert_eq!(shape.occupied().count(), 4, "{kind}");
            assert_eq!(shape.width(), shape.height(), "{kind}");
            assert!(matches!(shape.width(), 2..=4), "{kind}");
        }
    }

    #[test]
    fn shapes_are_fresh_copies() {
        let mut piece = ActivePiece::spawn(Tetromino::T, 10);
        piece.shape = piece.shape.rotate();
        assert_ne!(piece.shape, Tetromino::T.shape());
        assert_eq!(
            Tetromino::T.shape(),
            Shape::from_bits(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]])
        );
    }

    #[test]
    fn rotate_clockwise() {
        assert_eq!(
            Tetromino::J.shape().rotate(),
            Shape::from_bits(&[&[0, 1, 1], &[0, 1, 0], &[0, 1, 0]])
        );
        assert_eq!(
            Tetromino::I.shape().rotate(),
            Shape::from_bits(&[&[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0]])
        );
    }

    #[test]
    fn rotate_non_square() {
        let shape = Shape::from_bits(&[&[1, 1, 1], &[1, 0, 0]]);
        assert_eq!(
            shape.rotate(),
            Shape::from_bits(&[&[1, 1], &[0, 1], &[0, 1]])
        );
    }

    #[test]
    fn four_rotations_is_identity() {
        let shapes = Tetromino::ALL
            .map(Tetromino::shape)
            .into_iter()
            .chain([Shape::from_bits(&[&[1, 1, 1], &[1, 0, 0]]), Shape::default()]);
        for shape in shapes {
            assert_eq!(shape.rotate().rotate().rotate().rotate(), shape);
        }
    }

    #[test]
    fn columnless_rows_are_empty() {
        let shape = Shape::from_bits(&[&[], &[]]);
        assert_eq!(shape, Shape::default());
        assert_eq!((shape.height(), shape.width()), (0, 0));
        assert_eq!(shape.rotate().rotate().rotate().rotate(), shape);
    }

    #[test]
    fn spawn_is_centered() {
        for (kind, x) in [
            (Tetromino::I, 3),
            (Tetromino::O, 4),
            (Tetromino::T, 4),
        ] {
            let piece = ActivePiece::spawn(kind, 10);
            assert_eq!((piece.x, piece.y), (x, 0), "{kind}");
            assert_eq!(piece.color, kind.color());
        }
    }

    #[test]
    fn cells_are_offset_by_position() {
        let piece = ActivePiece::spawn(Tetromino::O, 10).moved(-1, 3);
        assert_eq!(
            piece.cells().collect::<Vec<_>>(),
            vec![(3, 3), (4, 3), (3, 4), (4, 4)]
        );
    }

    #[test]
    fn catalog_draws_every_piece() {
        let seen: HashSet<_> = Catalog::new(StdRng::seed_from_u64(7)).take(500).collect();
        assert_eq!(seen.len(), 7);
    }
}
