//! The game engine: placement, selection, movement, combat and win detection.
//!
//! A `Game` owns all mutable state. Each intent runs to completion and
//! either returns an outcome or a `GameError`. All checks run before the
//! first mutation, so a rejected intent changes nothing.
//!
//! ```text
//! Placement --begin_game--> InProgress --last enemy captured--> Ended
//!     ^                                                            |
//!     +------------------------- restart --------------------------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::direction::{movement, Delta, Label};
use crate::error::GameError;
use crate::piece::{Piece, PieceId, Slot};
use crate::{Player, Pos, PIECES_PER_PLAYER};

/// Lifecycle of a game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Placement,
    InProgress,
    Ended,
}

/// How many pieces each player has placed (0-5).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PlacementCount([u8; 2]);

impl PlacementCount {
    #[inline]
    pub fn get(&self, player: Player) -> u8 {
        self.0[player.index()]
    }

    #[inline]
    fn increment(&mut self, player: Player) {
        self.0[player.index()] += 1;
    }

    /// The player whose turn it is to place, A first. None once both are done.
    pub fn next_player(&self) -> Option<Player> {
        Player::all().find(|&p| self.get(p) < PIECES_PER_PLAYER)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.next_player().is_none()
    }
}

/// Whose turn it is and which of their pieces is selected.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TurnState {
    pub current: Player,
    pub selected: Option<PieceId>,
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState {
            current: Player::A,
            selected: None,
        }
    }
}

/// What the UI should ask for next during placement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// `player` should place `piece` next.
    Place { player: Player, piece: PieceId },
    /// Both players are done; the game can begin.
    ReadyToStart,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Place { player, piece } => write!(f, "Player {player}, place your {piece}"),
            Prompt::ReadyToStart => f.write_str("All pieces placed. Start the game to begin."),
        }
    }
}

/// Result of an accepted placement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct PlacementOutcome {
    pub piece: PieceId,
    pub pos: Pos,
    pub prompt: Prompt,
}

/// A move the selected piece can make.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct LegalMove {
    pub label: Label,
    pub to: Pos,
    /// Opposing pieces this move would capture, pass-through cell first.
    pub captures: Vec<PieceId>,
}

/// One entry of the move history.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct MoveRecord {
    pub piece: PieceId,
    /// The label as the player chose it, in their own frame.
    pub label: Label,
    pub from: Pos,
    pub to: Pos,
    pub captured: Vec<PieceId>,
}

/// `A-H1: F (Captured B-P2, B-P3)`
impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.piece, self.label)?;
        if !self.captured.is_empty() {
            let names: Vec<String> = self.captured.iter().map(|id| id.to_string()).collect();
            write!(f, " (Captured {})", names.join(", "))?;
        }
        Ok(())
    }
}

/// Result of an accepted move.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// Player to move next, or None when this move ended the game.
    pub next_player: Option<Player>,
    pub winner: Option<Player>,
}

/// Authoritative game state and the intents that change it.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    placed: PlacementCount,
    phase: GamePhase,
    turn: TurnState,
    history: Vec<MoveRecord>,
    winner: Option<Player>,
}

impl Game {
    /// A fresh game waiting for player A's first placement.
    pub fn new() -> Game {
        Game {
            board: Board::new(),
            placed: PlacementCount::default(),
            phase: GamePhase::Placement,
            turn: TurnState::default(),
            history: Vec::new(),
            winner: None,
        }
    }

    /// Set up a game in progress from explicit piece positions.
    ///
    /// Placement is treated as finished. If one side has no pieces the game
    /// is already over.
    pub fn from_pieces(pieces: &[(PieceId, Pos)], to_move: Player) -> Result<Game, GameError> {
        let mut game = Game::new();
        for &(id, pos) in pieces {
            if !pos.is_valid() {
                return Err(GameError::OffBoard {
                    row: pos.row(),
                    col: pos.col(),
                });
            }
            if game.board.contains(id) {
                return Err(GameError::DuplicatePiece(id));
            }
            if !game.board.is_empty(pos) {
                return Err(GameError::CellOccupied {
                    row: pos.row(),
                    col: pos.col(),
                });
            }
            game.board.insert(Piece::new(id, pos));
        }

        game.placed = PlacementCount([PIECES_PER_PLAYER; 2]);
        game.phase = GamePhase::InProgress;
        game.turn.current = to_move;
        if let Some(winner) = game.check_winner() {
            game.phase = GamePhase::Ended;
            game.winner = Some(winner);
        }
        Ok(game)
    }

    // ========== Accessors ==========

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.turn.current
    }

    #[inline]
    pub fn selected(&self) -> Option<PieceId> {
        self.turn.selected
    }

    #[inline]
    pub fn placed(&self, player: Player) -> u8 {
        self.placed.get(player)
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Placement prompt. None outside the placement phase.
    pub fn prompt(&self) -> Option<Prompt> {
        if self.phase != GamePhase::Placement {
            return None;
        }
        Some(match self.placed.next_player() {
            Some(player) => Prompt::Place {
                player,
                piece: PieceId::new(player, Slot::ORDER[self.placed.get(player) as usize]),
            },
            None => Prompt::ReadyToStart,
        })
    }

    // ========== Lifecycle ==========

    /// Begin a new placement phase on an empty board.
    pub fn start_placement(&mut self) {
        *self = Game::new();
        info!("placement started");
    }

    /// Throw away the current game and return to the pre-placement state.
    pub fn restart(&mut self) {
        self.start_placement();
    }

    /// Leave the placement phase. Player A moves first.
    pub fn begin_game(&mut self) -> Result<Player, GameError> {
        match self.phase {
            GamePhase::Ended => return Err(GameError::GameAlreadyEnded),
            GamePhase::InProgress => return Err(GameError::GameAlreadyStarted),
            GamePhase::Placement => {}
        }
        if !self.placed.is_complete() {
            return Err(GameError::PlacementIncomplete);
        }

        self.phase = GamePhase::InProgress;
        self.turn = TurnState::default();
        info!("game started, player {} to move", self.turn.current);
        Ok(self.turn.current)
    }

    // ========== Placement ==========

    /// Place the next piece of the placing player at `(row, col)`.
    ///
    /// The piece kind follows the fixed slot order P1, P2, H1, H2, P3.
    pub fn place(&mut self, row: u8, col: u8) -> Result<PlacementOutcome, GameError> {
        match self.phase {
            GamePhase::Ended => return Err(GameError::GameAlreadyEnded),
            GamePhase::InProgress => return Err(GameError::GameAlreadyStarted),
            GamePhase::Placement => {}
        }
        let player = self.placed.next_player().ok_or(GameError::PlacementComplete)?;
        let pos = Pos::new(row, col).ok_or(GameError::OffBoard { row, col })?;
        if row != player.home_row() {
            return Err(GameError::InvalidPlacementRow {
                player,
                expected: player.home_row(),
            });
        }
        if !self.board.is_empty(pos) {
            return Err(GameError::CellOccupied { row, col });
        }
        let slot = Slot::nth(self.placed.get(player)).ok_or(GameError::PlacementComplete)?;

        let id = PieceId::new(player, slot);
        self.board.insert(Piece::new(id, pos));
        self.placed.increment(player);
        debug!(piece = %id, pos = %pos, "placed piece");

        // Placement passes to B once A is done; the turn belongs to whoever places.
        if let Some(next) = self.placed.next_player() {
            self.turn.current = next;
        } else {
            info!("all pieces placed");
        }

        let prompt = self.prompt().unwrap_or(Prompt::ReadyToStart);
        Ok(PlacementOutcome { piece: id, pos, prompt })
    }

    // ========== Selection ==========

    /// Select one of the current player's pieces and list its legal moves.
    pub fn select(&mut self, id: PieceId) -> Result<Vec<LegalMove>, GameError> {
        self.ensure_in_progress()?;
        let piece = *self.board.get(id).ok_or(GameError::NoSuchPiece(id))?;
        if piece.owner != self.turn.current {
            return Err(GameError::NotYourPiece {
                current: self.turn.current,
            });
        }

        self.turn.selected = Some(id);
        debug!(piece = %id, "selected");
        Ok(self.moves_for(&piece))
    }

    /// Select by cell, the way a click on the board does.
    pub fn select_at(&mut self, row: u8, col: u8) -> Result<Vec<LegalMove>, GameError> {
        self.ensure_in_progress()?;
        let pos = Pos::new(row, col).ok_or(GameError::OffBoard { row, col })?;
        let id = self
            .board
            .at(pos)
            .filter(|piece| piece.owner == self.turn.current)
            .map(|piece| piece.id)
            .ok_or(GameError::NotYourPiece {
                current: self.turn.current,
            })?;
        self.select(id)
    }

    /// Legal moves of any piece in play. Does not change the selection.
    pub fn legal_moves(&self, id: PieceId) -> Result<Vec<LegalMove>, GameError> {
        let piece = self.board.get(id).ok_or(GameError::NoSuchPiece(id))?;
        Ok(self.moves_for(piece))
    }

    fn moves_for(&self, piece: &Piece) -> Vec<LegalMove> {
        piece
            .kind
            .labels()
            .iter()
            .filter_map(|&label| {
                let delta = movement(piece.kind, label, piece.owner)?;
                let to = self.destination(piece.pos, delta, piece.owner)?;
                Some(LegalMove {
                    label,
                    to,
                    captures: self.captures_along(piece.pos, delta, piece.owner),
                })
            })
            .collect()
    }

    // ========== Movement & Combat ==========

    /// Whether `player` may end a move on `to`: enemy-held cells are fine
    /// (that is combat), cells held by the player's own pieces are not.
    #[inline]
    pub fn is_valid_move(&self, to: Pos, player: Player) -> bool {
        to.is_valid() && self.board.owner_at(to) != Some(player)
    }

    fn destination(&self, from: Pos, delta: Delta, player: Player) -> Option<Pos> {
        from.offset(delta).filter(|&to| self.is_valid_move(to, player))
    }

    /// Opposing pieces on the cells a move passes through, then on the
    /// landing cell. Each cell is judged on its own.
    fn captures_along(&self, from: Pos, delta: Delta, mover: Player) -> Vec<PieceId> {
        let step = delta.signum();
        (1..=delta.steps())
            .filter_map(|i| from.offset(step.scale(i)))
            .filter_map(|pos| self.board.occupant(pos))
            .filter(|id| id.owner != mover)
            .collect()
    }

    /// Remove every piece the move captures. Returns them in capture order.
    fn resolve_combat(&mut self, from: Pos, delta: Delta, mover: Player) -> Vec<PieceId> {
        let captured = self.captures_along(from, delta, mover);
        for &id in &captured {
            self.board.remove(id);
            debug!(piece = %id, "captured");
        }
        captured
    }

    /// Move `id` by the player-relative `label`.
    ///
    /// Resolve destination, validate, capture, relocate, record, hand the
    /// turn over, then check for a winner.
    pub fn move_piece(&mut self, id: PieceId, label: Label) -> Result<MoveOutcome, GameError> {
        self.ensure_in_progress()?;
        let piece = *self.board.get(id).ok_or(GameError::NoSuchPiece(id))?;
        if piece.owner != self.turn.current {
            return Err(GameError::NotYourPiece {
                current: self.turn.current,
            });
        }
        let delta = movement(piece.kind, label, piece.owner).ok_or(GameError::LabelNotAllowed {
            kind: piece.kind,
            label,
        })?;
        let to = self
            .destination(piece.pos, delta, piece.owner)
            .ok_or(GameError::IllegalDestination { piece: id, label })?;

        let captured = self.resolve_combat(piece.pos, delta, piece.owner);
        self.board.relocate(id, to);

        let record = MoveRecord {
            piece: id,
            label,
            from: piece.pos,
            to,
            captured,
        };
        debug!(%record, "move");
        self.history.push(record.clone());

        self.turn.current = self.turn.current.opponent();
        self.turn.selected = None;

        let winner = self.check_winner();
        if let Some(player) = winner {
            self.phase = GamePhase::Ended;
            self.winner = Some(player);
            info!("player {player} wins after {} moves", self.history.len());
        }

        Ok(MoveOutcome {
            record,
            next_player: if winner.is_none() { Some(self.turn.current) } else { None },
            winner,
        })
    }

    /// The surviving player once the other side has no pieces left.
    pub fn check_winner(&self) -> Option<Player> {
        if self.board.count(Player::B) == 0 {
            Some(Player::A)
        } else if self.board.count(Player::A) == 0 {
            Some(Player::B)
        } else {
            None
        }
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::InProgress => Ok(()),
            GamePhase::Placement => Err(GameError::GameNotStarted),
            GamePhase::Ended => Err(GameError::GameAlreadyEnded),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
