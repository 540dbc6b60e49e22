//! Board module - manages the game grid
//!
//! The board is a 10x21 grid where each cell is empty or holds the kind of a
//! locked piece. Storage is a flat row-major array, no allocation.
//! Coordinates: `(x, y)` with x in 0..10 (left to right) and y in 0..21
//! (top to bottom). Rows above the board (negative y) are always open so
//! pieces may spawn partially hidden.

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// Row indices removed by one clear, ascending
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 21 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a single cell can hold part of a piece.
    ///
    /// Columns must be on the board and rows below the floor are rejected.
    /// Rows above the board are open; rows on the board must be empty.
    #[inline]
    pub fn is_open(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        if y < 0 {
            return true;
        }
        matches!(self.get(x, y), Some(None))
    }

    /// Whether `piece` fits with its anchor at `(x, y)`
    pub fn is_valid_at(&self, piece: &Piece, x: i8, y: i8) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(dx, dy)| self.is_open(x + dx, y + dy))
    }

    /// Whether `piece` fits at its own anchor
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        self.is_valid_at(piece, piece.x, piece.y)
    }

    /// Resting row for `piece` dropped straight down from its anchor.
    ///
    /// Returns the largest `y' >= piece.y` such that the piece is valid at
    /// `y'` and not at `y' + 1`. If the piece is not valid where it stands,
    /// its own row is returned.
    pub fn ghost_drop_y(&self, piece: &Piece) -> i8 {
        let mut y = piece.y;
        while self.is_valid_at(piece, piece.x, y + 1) {
            y += 1;
        }
        y
    }

    /// Write the piece's kind into every covered cell on the board.
    ///
    /// Cells above the top row are discarded. The caller has already
    /// validated the position.
    pub fn merge(&mut self, piece: &Piece) {
        debug_assert!(
            self.is_valid_position(piece),
            "merging {:?} at an invalid position",
            piece.kind
        );
        for (dx, dy) in piece.cells() {
            let (x, y) = (piece.x + dx, piece.y + dy);
            if y >= 0 {
                self.set(x, y, Some(piece.kind));
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Indices of every full row, ascending
    pub fn full_rows(&self) -> ClearedRows {
        (0..BOARD_HEIGHT as usize)
            .filter(|&y| self.is_row_full(y))
            .map(|y| y as u8)
            .collect()
    }

    /// Remove every full row, shift the rest down and return the removed
    /// indices (ascending, as they were before removal).
    ///
    /// Two-pointer compaction from the bottom; relative order of the
    /// surviving rows is preserved and empty rows fill the top.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y as u8);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared.reverse();
        cleared
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write cell identifiers (0 empty, 1..=7 piece kinds) into a grid
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * width + x].map_or(0, |k| k.id());
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;
    use proptest::prelude::*;

    fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(kind));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 20), Some(209));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 21), None);
    }

    #[test]
    fn test_negative_rows_are_open() {
        let board = Board::new();
        assert!(board.is_open(0, -3));
        assert!(!board.is_open(-1, -3));
        assert!(!board.is_open(10, -1));
        assert!(!board.is_open(0, 21));
    }

    #[test]
    fn test_o_piece_bounds() {
        let board = Board::new();
        let o = Piece::new(PieceKind::O);
        assert!(!board.is_valid_at(&o, -1, 0));
        // Right edge: columns 8 and 9 are the last that fit
        assert!(board.is_valid_at(&o, 8, 0));
        assert!(!board.is_valid_at(&o, 9, 0));
        assert!(board.is_valid_at(&o, 4, 0));
        assert!(board.is_valid_at(&o, 0, 19));
        assert!(!board.is_valid_at(&o, 0, 20));
    }

    #[test]
    fn test_overlap_is_invalid() {
        let mut board = Board::new();
        board.set(4, 1, Some(PieceKind::J));
        let o = Piece::new(PieceKind::O).at(4, 0);
        assert!(!board.is_valid_position(&o));
        assert!(board.is_valid_position(&o.at(6, 0)));
    }

    #[test]
    fn test_ghost_drop_on_empty_board() {
        let board = Board::new();
        let i = Piece::new(PieceKind::I);
        assert_eq!(board.ghost_drop_y(&i), 20);
        let t = Piece::new(PieceKind::T);
        assert_eq!(board.ghost_drop_y(&t), 19);
    }

    #[test]
    fn test_ghost_drop_onto_stack() {
        let mut board = Board::new();
        fill_row(&mut board, 20, PieceKind::Z);
        board.set(0, 20, None);
        let o = Piece::new(PieceKind::O);
        assert_eq!(board.ghost_drop_y(&o), 18);
        // Starting above the board still lands on the stack
        assert_eq!(board.ghost_drop_y(&o.at(4, -2)), 18);
    }

    #[test]
    fn test_merge_skips_hidden_rows() {
        let mut board = Board::new();
        let vertical_i = Piece::new(PieceKind::I).rotated().at(0, -2);
        board.merge(&vertical_i);
        assert_eq!(board.filled_count(), 2);
        assert_eq!(board.get(0, 0), Some(Some(PieceKind::I)));
        assert_eq!(board.get(0, 1), Some(Some(PieceKind::I)));
    }

    #[test]
    fn test_clear_single_bottom_row() {
        let mut board = Board::new();
        fill_row(&mut board, 20, PieceKind::I);
        board.set(3, 19, Some(PieceKind::T));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[20]);
        assert_eq!(board.get(3, 20), Some(Some(PieceKind::T)));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_clear_non_adjacent_rows_keeps_order() {
        let mut board = Board::new();
        fill_row(&mut board, 20, PieceKind::I);
        board.set(1, 19, Some(PieceKind::L));
        fill_row(&mut board, 18, PieceKind::O);
        board.set(2, 17, Some(PieceKind::S));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[18, 20]);
        assert_eq!(board.get(1, 20), Some(Some(PieceKind::L)));
        assert_eq!(board.get(2, 19), Some(Some(PieceKind::S)));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut board = Board::new();
        board.set(0, 20, Some(PieceKind::I));
        let before = board.clone();
        assert!(board.clear_full_rows().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_u8_grid() {
        let mut board = Board::new();
        board.set(0, 0, Some(PieceKind::I));
        board.set(9, 20, Some(PieceKind::S));
        let mut grid = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[0][0], 1);
        assert_eq!(grid[20][9], 7);
        assert_eq!(grid[10][5], 0);
    }

    fn any_kind() -> impl Strategy<Value = PieceKind> {
        prop::sample::select(PieceKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn validity_matches_cellwise_bounds(
            kind in any_kind(),
            turns in 0usize..4,
            x in -5i8..15,
            y in -5i8..25,
        ) {
            let board = Board::new();
            let mut piece = Piece::new(kind);
            for _ in 0..turns {
                piece = piece.rotated();
            }
            let inside = piece.cells().iter().all(|&(dx, dy)| {
                let (cx, cy) = (x + dx, y + dy);
                (0..BOARD_WIDTH as i8).contains(&cx) && cy < BOARD_HEIGHT as i8
            });
            prop_assert_eq!(board.is_valid_at(&piece, x, y), inside);
        }

        #[test]
        fn ghost_row_is_a_resting_row(kind in any_kind(), x in 0i8..7, junk in prop::collection::vec((0i8..10, 5i8..21), 0..30)) {
            let mut board = Board::new();
            for (cx, cy) in junk {
                board.set(cx, cy, Some(PieceKind::Z));
            }
            let piece = Piece::new(kind).at(x, 0);
            prop_assume!(board.is_valid_position(&piece));
            let ghost = board.ghost_drop_y(&piece);
            prop_assert!(ghost >= piece.y);
            prop_assert!(board.is_valid_at(&piece, x, ghost));
            prop_assert!(!board.is_valid_at(&piece, x, ghost + 1));
        }
    }
}
