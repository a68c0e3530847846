//! Rejections returned by the engine.
//!
//! Every variant is a recoverable, user-facing rejection. The engine checks
//! before it mutates, so an `Err` always leaves the game exactly as it was.

use thiserror::Error;

use crate::direction::Label;
use crate::piece::{PieceId, PieceKind};
use crate::Player;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("player {player} must place pieces on row {expected}")]
    InvalidPlacementRow { player: Player, expected: u8 },

    #[error("cell ({row},{col}) is already occupied")]
    CellOccupied { row: u8, col: u8 },

    #[error("cell ({row},{col}) is off the board")]
    OffBoard { row: u8, col: u8 },

    #[error("all pieces have been placed")]
    PlacementComplete,

    #[error("both players must place all pieces before the game starts")]
    PlacementIncomplete,

    #[error("the game has already started")]
    GameAlreadyStarted,

    #[error("the game has not started yet")]
    GameNotStarted,

    #[error("the game has ended; restart to play again")]
    GameAlreadyEnded,

    #[error("that piece does not belong to player {current}")]
    NotYourPiece { current: Player },

    #[error("no piece {0} on the board")]
    NoSuchPiece(PieceId),

    #[error("{kind:?} cannot move {label}")]
    LabelNotAllowed { kind: PieceKind, label: Label },

    #[error("{piece} cannot move {label} from there")]
    IllegalDestination { piece: PieceId, label: Label },

    #[error("unknown move label {0:?}")]
    UnknownLabel(String),

    #[error("malformed piece id {0:?}")]
    MalformedPieceId(String),

    #[error("piece {0} appears more than once")]
    DuplicatePiece(PieceId),
}

impl GameError {
    /// Stable machine-readable name, used by the API and the WASM bindings.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidPlacementRow { .. } => "InvalidPlacementRow",
            GameError::CellOccupied { .. } => "CellOccupied",
            GameError::OffBoard { .. } => "OffBoard",
            GameError::PlacementComplete => "PlacementComplete",
            GameError::PlacementIncomplete => "PlacementIncomplete",
            GameError::GameAlreadyStarted => "GameAlreadyStarted",
            GameError::GameNotStarted => "GameNotStarted",
            GameError::GameAlreadyEnded => "GameAlreadyEnded",
            GameError::NotYourPiece { .. } => "NotYourPiece",
            GameError::NoSuchPiece(_) => "NoSuchPiece",
            GameError::LabelNotAllowed { .. } => "LabelNotAllowed",
            GameError::IllegalDestination { .. } => "IllegalDestination",
            GameError::UnknownLabel(_) => "UnknownLabel",
            GameError::MalformedPieceId(_) => "MalformedPieceId",
            GameError::DuplicatePiece(_) => "DuplicatePiece",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Slot;

    #[test]
    fn test_messages() {
        let err = GameError::InvalidPlacementRow { player: Player::B, expected: 4 };
        assert_eq!(err.to_string(), "player B must place pieces on row 4");

        let err = GameError::NoSuchPiece(PieceId::new(Player::A, Slot::H1));
        assert_eq!(err.to_string(), "no piece A-H1 on the board");

        let err = GameError::IllegalDestination {
            piece: PieceId::new(Player::A, Slot::P2),
            label: Label::Back,
        };
        assert_eq!(err.to_string(), "A-P2 cannot move B from there");
    }

    #[test]
    fn test_codes() {
        assert_eq!(GameError::GameAlreadyEnded.code(), "GameAlreadyEnded");
        assert_eq!(
            GameError::CellOccupied { row: 0, col: 0 }.code(),
            "CellOccupied"
        );
        assert_eq!(
            GameError::NotYourPiece { current: Player::A }.code(),
            "NotYourPiece"
        );
    }
}
