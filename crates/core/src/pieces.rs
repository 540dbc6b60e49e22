//! Pieces module - piece matrices and clockwise rotation
//!
//! Every piece is a small boolean matrix (at most 4x4) plus its kind and an
//! anchor `(x, y)` naming the board cell under the matrix's top-left corner.
//!
//! Rotation turns the matrix 90° clockwise inside its bounding box: rows are
//! reversed, then the matrix is transposed, so a `w x h` piece becomes
//! `h x w`. The anchor does not move and no wall kicks are attempted. Four
//! rotations give back the exact original matrix.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, BOARD_WIDTH};

/// Largest side of any piece matrix
pub const MAX_PIECE_SIZE: usize = 4;

/// Offset of an occupied cell relative to the piece anchor
pub type CellOffset = (i8, i8);

/// Occupied cells of a piece; every catalog piece has exactly four
pub type PieceCells = ArrayVec<CellOffset, { MAX_PIECE_SIZE * MAX_PIECE_SIZE }>;

type Matrix = [[bool; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];

/// Spawn-orientation rows for each kind, as strings of `0`/`1`.
fn spawn_rows(kind: PieceKind) -> &'static [&'static str] {
    match kind {
        PieceKind::I => &["1111"],
        PieceKind::O => &["11", "11"],
        PieceKind::T => &["111", "010"],
        PieceKind::L => &["111", "100"],
        PieceKind::J => &["111", "001"],
        PieceKind::Z => &["110", "011"],
        PieceKind::S => &["011", "110"],
    }
}

/// A piece: kind, matrix, and anchor position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    cells: Matrix,
    width: u8,
    height: u8,
}

impl Piece {
    /// Create a piece in spawn orientation at its spawn position
    /// (`x = BOARD_WIDTH / 2 - width / 2`, `y = 0`).
    pub fn new(kind: PieceKind) -> Self {
        let rows = spawn_rows(kind);
        let mut cells = [[false; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.bytes().enumerate() {
                cells[r][c] = ch == b'1';
            }
        }
        let width = rows[0].len() as u8;
        let height = rows.len() as u8;

        Self {
            kind,
            x: spawn_x(width),
            y: 0,
            cells,
            width,
            height,
        }
    }

    /// Same piece with its anchor moved to `(x, y)`
    pub fn at(self, x: i8, y: i8) -> Self {
        Self { x, y, ..self }
    }

    /// Same piece shifted by `(dx, dy)`
    pub fn shifted(self, dx: i8, dy: i8) -> Self {
        self.at(self.x + dx, self.y + dy)
    }

    /// Matrix width in cells
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Matrix height in cells
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether matrix cell `(col, row)` is occupied
    pub fn filled(&self, col: usize, row: usize) -> bool {
        col < self.width as usize && row < self.height as usize && self.cells[row][col]
    }

    /// Occupied cells as offsets from the anchor, row-major
    pub fn cells(&self) -> PieceCells {
        let mut out = PieceCells::new();
        for row in 0..self.height as usize {
            for col in 0..self.width as usize {
                if self.cells[row][col] {
                    out.push((col as i8, row as i8));
                }
            }
        }
        out
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&filled| filled)
            .count()
    }

    /// Rotate 90° clockwise. Kind and anchor are preserved.
    pub fn rotated(&self) -> Self {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut cells = [[false; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        // new[i][j] = old[h - 1 - j][i]; the result is w rows by h columns
        for (i, new_row) in cells.iter_mut().enumerate().take(w) {
            for (j, cell) in new_row.iter_mut().enumerate().take(h) {
                *cell = self.cells[h - 1 - j][i];
            }
        }

        Self {
            cells,
            width: self.height,
            height: self.width,
            ..*self
        }
    }

    /// Rows of the matrix as `0`/`1` strings (for debugging and tests)
    pub fn pattern(&self) -> Vec<String> {
        (0..self.height as usize)
            .map(|row| {
                (0..self.width as usize)
                    .map(|col| if self.cells[row][col] { '1' } else { '0' })
                    .collect()
            })
            .collect()
    }
}

/// Spawn column for a piece of the given width
pub fn spawn_x(width: u8) -> i8 {
    (BOARD_WIDTH / 2) as i8 - (width / 2) as i8
}

/// Free-function form of [`Piece::rotated`].
pub fn rotate(piece: &Piece) -> Piece {
    piece.rotated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_catalog_dimensions() {
        let dims = |k| {
            let p = Piece::new(k);
            (p.width(), p.height())
        };
        assert_eq!(dims(PieceKind::I), (4, 1));
        assert_eq!(dims(PieceKind::O), (2, 2));
        for k in [
            PieceKind::T,
            PieceKind::L,
            PieceKind::J,
            PieceKind::Z,
            PieceKind::S,
        ] {
            assert_eq!(dims(k), (3, 2));
        }
    }

    #[test]
    fn test_every_piece_has_four_cells() {
        for kind in PieceKind::ALL {
            let p = Piece::new(kind);
            assert_eq!(p.occupied_count(), 4, "{:?}", kind);
            assert_eq!(p.cells().len(), 4);
        }
    }

    #[test]
    fn test_spawn_positions() {
        assert_eq!(Piece::new(PieceKind::I).x, 3);
        assert_eq!(Piece::new(PieceKind::O).x, 4);
        assert_eq!(Piece::new(PieceKind::T).x, 4);
        for kind in PieceKind::ALL {
            assert_eq!(Piece::new(kind).y, 0);
        }
    }

    #[test]
    fn test_t_rotation_pattern() {
        let t = Piece::new(PieceKind::T);
        assert_eq!(t.pattern(), vec!["111", "010"]);
        let r1 = t.rotated();
        assert_eq!(r1.pattern(), vec!["01", "11", "01"]);
        let r2 = r1.rotated();
        assert_eq!(r2.pattern(), vec!["010", "111"]);
    }

    #[test]
    fn test_i_rotation_swaps_dimensions() {
        let i = Piece::new(PieceKind::I);
        let r = i.rotated();
        assert_eq!((r.width(), r.height()), (1, 4));
        assert_eq!(r.pattern(), vec!["1", "1", "1", "1"]);
    }

    #[test]
    fn test_rotation_keeps_anchor_and_kind() {
        let p = Piece::new(PieceKind::L).at(2, 7);
        let r = rotate(&p);
        assert_eq!((r.x, r.y), (2, 7));
        assert_eq!(r.kind, PieceKind::L);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in PieceKind::ALL {
            let p = Piece::new(kind);
            let back = p.rotated().rotated().rotated().rotated();
            assert_eq!(back, p, "{:?}", kind);
        }
    }

    #[test]
    fn test_shifted() {
        let p = Piece::new(PieceKind::S).at(0, 0).shifted(2, -1);
        assert_eq!((p.x, p.y), (2, -1));
    }

    fn any_kind() -> impl Strategy<Value = PieceKind> {
        prop::sample::select(PieceKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn rotation_preserves_cell_count(kind in any_kind(), turns in 0usize..8) {
            let mut p = Piece::new(kind);
            for _ in 0..turns {
                p = p.rotated();
            }
            prop_assert_eq!(p.rotated().occupied_count(), p.occupied_count());
        }

        #[test]
        fn rotation_has_period_four(kind in any_kind(), turns in 0usize..8) {
            let mut p = Piece::new(kind);
            for _ in 0..turns {
                p = p.rotated();
            }
            let back = p.rotated().rotated().rotated().rotated();
            prop_assert_eq!(back, p);
        }
    }
}
