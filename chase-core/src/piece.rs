//! Piece kinds, placement slots and piece identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::direction::Label;
use crate::error::GameError;
use crate::{Player, Pos};

/// Piece type.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Hero1,
    Hero2,
}

impl PieceKind {
    /// Buttons offered for this kind.
    pub fn labels(self) -> &'static [Label; 4] {
        match self {
            PieceKind::Pawn | PieceKind::Hero1 => &Label::ORTHOGONAL,
            PieceKind::Hero2 => &Label::DIAGONAL,
        }
    }

    /// Cells travelled along each moving axis.
    #[inline]
    pub fn stride(self) -> i8 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Hero1 | PieceKind::Hero2 => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Hero1 => "hero1",
            PieceKind::Hero2 => "hero2",
        }
    }

    /// One line for the movement guide.
    pub fn description(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn (P1, P2, P3): moves 1 step straight in any direction",
            PieceKind::Hero1 => {
                "Hero1 (H1): moves 2 steps straight in any direction, capturing along the way"
            }
            PieceKind::Hero2 => {
                "Hero2 (H2): moves 2 steps diagonally in any direction, capturing along the way"
            }
        }
    }

    pub fn all() -> impl Iterator<Item = PieceKind> {
        [PieceKind::Pawn, PieceKind::Hero1, PieceKind::Hero2].into_iter()
    }
}

/// Placement slot. Each player fills the slots in `Slot::ORDER`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Slot {
    P1,
    P2,
    H1,
    H2,
    P3,
}

impl Slot {
    pub const ORDER: [Slot; 5] = [Slot::P1, Slot::P2, Slot::H1, Slot::H2, Slot::P3];

    /// Slot filled by the `n`th placement (0-based), if any remain.
    #[inline]
    pub fn nth(n: u8) -> Option<Slot> {
        Slot::ORDER.get(n as usize).copied()
    }

    #[inline]
    pub fn kind(self) -> PieceKind {
        match self {
            Slot::P1 | Slot::P2 | Slot::P3 => PieceKind::Pawn,
            Slot::H1 => PieceKind::Hero1,
            Slot::H2 => PieceKind::Hero2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::P1 => "P1",
            Slot::P2 => "P2",
            Slot::H1 => "H1",
            Slot::H2 => "H2",
            Slot::P3 => "P3",
        }
    }

    fn parse(s: &str) -> Option<Slot> {
        Slot::ORDER.into_iter().find(|slot| slot.as_str() == s)
    }
}

/// Unique piece identifier, written `"A-P1"`, `"B-H2"`, ...
///
/// Ordered by owner, then by placement slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PieceId {
    pub owner: Player,
    pub slot: Slot,
}

impl PieceId {
    #[inline]
    pub fn new(owner: Player, slot: Slot) -> PieceId {
        PieceId { owner, slot }
    }

    #[inline]
    pub fn kind(self) -> PieceKind {
        self.slot.kind()
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.owner, self.slot.as_str())
    }
}

impl FromStr for PieceId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<PieceId, GameError> {
        let malformed = || GameError::MalformedPieceId(s.to_string());
        let (owner, slot) = s.trim().split_once('-').ok_or_else(malformed)?;

        let mut chars = owner.chars();
        let owner = match (chars.next(), chars.next()) {
            (Some(c), None) => Player::from_char(c).ok_or_else(malformed)?,
            _ => return Err(malformed()),
        };
        let slot = Slot::parse(slot).ok_or_else(malformed)?;
        Ok(PieceId::new(owner, slot))
    }
}

impl From<PieceId> for String {
    fn from(id: PieceId) -> String {
        id.to_string()
    }
}

impl TryFrom<String> for PieceId {
    type Error = GameError;

    fn try_from(s: String) -> Result<PieceId, GameError> {
        s.parse()
    }
}

/// A piece on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: Player,
    pub pos: Pos,
}

impl Piece {
    pub fn new(id: PieceId, pos: Pos) -> Piece {
        Piece {
            id,
            kind: id.kind(),
            owner: id.owner,
            pos,
        }
    }
}
