//! Board state: every piece in play, indexed both by id and by cell.
//!
//! The two indexes are only touched through `insert`, `remove` and
//! `relocate`, which keep them in lockstep:
//!
//! ```text
//! pieces[id].pos == p   <=>   cells[p] == Some(id)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::piece::{Piece, PieceId};
use crate::{Player, Pos, BOARD_SIZE, CELL_COUNT};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    pieces: BTreeMap<PieceId, Piece>,
    cells: [Option<PieceId>; CELL_COUNT],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Board {
        Board {
            pieces: BTreeMap::new(),
            cells: [None; CELL_COUNT],
        }
    }

    // ========== Queries ==========

    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.contains_key(&id)
    }

    /// Id of the piece standing on `pos`, if any.
    #[inline]
    pub fn occupant(&self, pos: Pos) -> Option<PieceId> {
        self.cells[pos.0 as usize]
    }

    /// The piece standing on `pos`, if any.
    #[inline]
    pub fn at(&self, pos: Pos) -> Option<&Piece> {
        self.occupant(pos).and_then(|id| self.pieces.get(&id))
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.occupant(pos).is_none()
    }

    /// Owner of the piece on `pos`, if any.
    #[inline]
    pub fn owner_at(&self, pos: Pos) -> Option<Player> {
        self.occupant(pos).map(|id| id.owner)
    }

    /// All pieces, ordered by owner then placement slot.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Number of pieces `player` still has on the board.
    pub fn count(&self, player: Player) -> usize {
        self.pieces.keys().filter(|id| id.owner == player).count()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    // ========== Mutation ==========

    /// Put a new piece on the board.
    /// Does NOT validate - caller must ensure the cell is empty and the id unused.
    pub fn insert(&mut self, piece: Piece) {
        debug_assert!(self.is_empty(piece.pos), "cell {} occupied", piece.pos);
        debug_assert!(!self.contains(piece.id), "{} already placed", piece.id);
        self.cells[piece.pos.0 as usize] = Some(piece.id);
        self.pieces.insert(piece.id, piece);
    }

    /// Take a piece off the board. Returns None if it is not in play.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;
        self.cells[piece.pos.0 as usize] = None;
        Some(piece)
    }

    /// Move a piece to an empty cell. Returns the cell it left.
    /// Does NOT validate - caller must clear the destination first.
    pub fn relocate(&mut self, id: PieceId, to: Pos) -> Option<Pos> {
        debug_assert!(self.is_empty(to), "cell {} occupied", to);
        let piece = self.pieces.get_mut(&id)?;
        let from = piece.pos;
        piece.pos = to;
        self.cells[from.0 as usize] = None;
        self.cells[to.0 as usize] = Some(id);
        Some(from)
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
        self.cells = [None; CELL_COUNT];
    }

    /// Check that both indexes agree. Used by tests.
    pub fn is_consistent(&self) -> bool {
        let by_id = self
            .pieces
            .iter()
            .all(|(id, piece)| piece.id == *id && self.cells[piece.pos.0 as usize] == Some(*id));
        let by_cell = self.cells.iter().flatten().count() == self.pieces.len();
        by_id && by_cell
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Text grid, row 0 on top. Empty cells show as `....`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match self.occupant(Pos::from_row_col(row, col)) {
                    Some(id) => write!(f, "{id}")?,
                    None => f.write_str("....")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
