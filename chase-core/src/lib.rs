//! Rules engine for a two-player chase game on a 5x5 grid.
//!
//! Each player drops five pieces on their home row, then the players take
//! turns moving one piece. Pieces standing on or jumped over by a move are
//! captured. A player with no pieces left loses.
//!
//! # Board Layout
//!
//! ```text
//! Cell indices (row-major order, row * 5 + col):
//!
//!          col 0  1  2  3  4
//!   row 0:     0  1  2  3  4    <- home row of player A (A moves toward +row)
//!   row 1:     5  6  7  8  9
//!   row 2:    10 11 12 13 14
//!   row 3:    15 16 17 18 19
//!   row 4:    20 21 22 23 24    <- home row of player B (B moves toward -row)
//! ```
//!
//! # Pieces
//!
//! ```text
//! Placement order per player: P1, P2, H1, H2, P3
//!   P1, P2, P3  pawn   1 step orthogonal   L R F B
//!   H1          hero1  2 steps orthogonal  L R F B
//!   H2          hero2  2 steps diagonal    FL FR BL BR
//! ```
//!
//! The engine performs no I/O. A presentation layer (the HTTP API, or the
//! WASM bindings behind the `wasm` feature) turns clicks into intents and
//! renders the returned outcomes.

pub mod board;
pub mod direction;
pub mod error;
pub mod game;
pub mod piece;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

pub use board::Board;
pub use direction::{to_absolute_direction, Delta, Label};
pub use error::GameError;
pub use game::{Game, GamePhase, LegalMove, MoveOutcome, MoveRecord, PlacementOutcome, Prompt};
pub use piece::{Piece, PieceId, PieceKind, Slot};
pub use view::GameView;

/// Width and height of the grid.
pub const BOARD_SIZE: u8 = 5;

/// Number of cells on the grid.
pub const CELL_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Pieces each player places before play begins.
pub const PIECES_PER_PLAYER: u8 = 5;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    A,
    B,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Row direction this player advances in: +1 for A, -1 for B.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Player::A => 1,
            Player::B => -1,
        }
    }

    /// The row this player must place pieces on.
    #[inline]
    pub fn home_row(self) -> u8 {
        match self {
            Player::A => 0,
            Player::B => BOARD_SIZE - 1,
        }
    }

    /// Index into per-player arrays (A = 0, B = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }

    /// Single-letter name used in piece identifiers.
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Player::A => 'A',
            Player::B => 'B',
        }
    }

    /// Parse the single-letter name.
    #[inline]
    pub fn from_char(c: char) -> Option<Player> {
        match c {
            'A' => Some(Player::A),
            'B' => Some(Player::B),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = Player> {
        [Player::A, Player::B].into_iter()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Position on the 5x5 grid (0-24), row-major.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-4 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Pos(row * BOARD_SIZE + col)
    }

    /// Checked constructor for coordinates coming from outside the engine.
    #[inline]
    pub fn new(row: u8, col: u8) -> Option<Pos> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Pos(row * BOARD_SIZE + col))
        } else {
            None
        }
    }

    /// Get the row (0-4).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Get the column (0-4).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < CELL_COUNT
    }

    /// Shift by a delta. Returns None if the result leaves the grid.
    #[inline]
    pub fn offset(self, delta: Delta) -> Option<Pos> {
        let row = self.row() as i8 + delta.row;
        let col = self.col() as i8 + delta.col;
        let size = BOARD_SIZE as i8;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Pos::from_row_col(row as u8, col as u8))
        } else {
            None
        }
    }

    /// `[row, col]`, the shape the views and the browser use.
    #[inline]
    pub fn to_pair(self) -> [u8; 2] {
        [self.row(), self.col()]
    }

    /// Iterate over all 25 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELL_COUNT as u8).map(Pos)
    }
}

/// Serialized as `[row, col]`.
impl Serialize for Pos {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_pair().serialize(serializer)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row(), self.col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::A.opponent(), Player::B);
        assert_eq!(Player::B.opponent(), Player::A);
    }

    #[test]
    fn test_player_home_rows_face_each_other() {
        assert_eq!(Player::A.home_row(), 0);
        assert_eq!(Player::B.home_row(), 4);
        assert_eq!(Player::A.forward(), 1);
        assert_eq!(Player::B.forward(), -1);
    }

    #[test]
    fn test_player_char_roundtrip() {
        for player in Player::all() {
            assert_eq!(Player::from_char(player.as_char()), Some(player));
        }
        assert_eq!(Player::from_char('C'), None);
    }

    #[test]
    fn test_pos_from_row_col() {
        assert_eq!(Pos::from_row_col(0, 0), Pos(0));
        assert_eq!(Pos::from_row_col(0, 4), Pos(4));
        assert_eq!(Pos::from_row_col(1, 0), Pos(5));
        assert_eq!(Pos::from_row_col(2, 2), Pos(12));
        assert_eq!(Pos::from_row_col(4, 4), Pos(24));
    }

    #[test]
    fn test_pos_row_col() {
        for pos in Pos::all() {
            assert_eq!(Pos::from_row_col(pos.row(), pos.col()), pos);
        }
        assert_eq!(Pos::all().count(), CELL_COUNT);
    }

    #[test]
    fn test_pos_new_rejects_off_board() {
        assert_eq!(Pos::new(4, 4), Some(Pos(24)));
        assert_eq!(Pos::new(5, 0), None);
        assert_eq!(Pos::new(0, 5), None);
    }

    #[test]
    fn test_pos_offset() {
        let center = Pos::from_row_col(2, 2);
        assert_eq!(center.offset(Delta::new(2, -2)), Some(Pos::from_row_col(4, 0)));
        assert_eq!(center.offset(Delta::new(-1, 0)), Some(Pos::from_row_col(1, 2)));
        assert_eq!(center.offset(Delta::new(3, 0)), None);

        let corner = Pos::from_row_col(0, 0);
        assert_eq!(corner.offset(Delta::new(0, -1)), None);
        assert_eq!(corner.offset(Delta::new(-1, 0)), None);
    }
}
