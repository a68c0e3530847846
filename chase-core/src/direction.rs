//! Move labels and the player-relative direction model.
//!
//! Labels are written in player A's frame: forward is `+row` and A's own
//! left is `+col` (A looks down the board from row 0). Player B faces the
//! other way, so forward becomes `-row` and the left/right component of every
//! label is mirrored (L<->R, FL<->FR, BL<->BR). A button reading "L" therefore
//! always moves the piece to its owner's left.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::piece::PieceKind;
use crate::Player;

/// Signed row/column displacement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Delta {
    pub row: i8,
    pub col: i8,
}

impl Delta {
    #[inline]
    pub const fn new(row: i8, col: i8) -> Delta {
        Delta { row, col }
    }

    #[inline]
    pub fn scale(self, k: i8) -> Delta {
        Delta::new(self.row * k, self.col * k)
    }

    /// Unit step toward the same target (each component reduced to -1, 0 or 1).
    #[inline]
    pub fn signum(self) -> Delta {
        Delta::new(self.row.signum(), self.col.signum())
    }

    /// Number of single steps this delta spans (Chebyshev length).
    #[inline]
    pub fn steps(self) -> i8 {
        self.row.abs().max(self.col.abs())
    }
}

/// Move button label, in the acting player's own frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "B")]
    Back,
    #[serde(rename = "FL")]
    ForwardLeft,
    #[serde(rename = "FR")]
    ForwardRight,
    #[serde(rename = "BL")]
    BackLeft,
    #[serde(rename = "BR")]
    BackRight,
}

impl Label {
    pub const ORTHOGONAL: [Label; 4] = [Label::Left, Label::Right, Label::Forward, Label::Back];
    pub const DIAGONAL: [Label; 4] = [
        Label::ForwardLeft,
        Label::ForwardRight,
        Label::BackLeft,
        Label::BackRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Left => "L",
            Label::Right => "R",
            Label::Forward => "F",
            Label::Back => "B",
            Label::ForwardLeft => "FL",
            Label::ForwardRight => "FR",
            Label::BackLeft => "BL",
            Label::BackRight => "BR",
        }
    }

    /// Swap the left/right component. Forward and back are unaffected.
    #[inline]
    pub fn mirrored(self) -> Label {
        match self {
            Label::Left => Label::Right,
            Label::Right => Label::Left,
            Label::ForwardLeft => Label::ForwardRight,
            Label::ForwardRight => Label::ForwardLeft,
            Label::BackLeft => Label::BackRight,
            Label::BackRight => Label::BackLeft,
            Label::Forward | Label::Back => self,
        }
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        Label::DIAGONAL.contains(&self)
    }

    /// Unit step in player A's frame, forward = +1.
    #[inline]
    fn base_step(self) -> Delta {
        match self {
            Label::Left => Delta::new(0, 1),
            Label::Right => Delta::new(0, -1),
            Label::Forward => Delta::new(1, 0),
            Label::Back => Delta::new(-1, 0),
            Label::ForwardLeft => Delta::new(1, 1),
            Label::ForwardRight => Delta::new(1, -1),
            Label::BackLeft => Delta::new(-1, 1),
            Label::BackRight => Delta::new(-1, -1),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Label, GameError> {
        match s.trim() {
            "L" => Ok(Label::Left),
            "R" => Ok(Label::Right),
            "F" => Ok(Label::Forward),
            "B" => Ok(Label::Back),
            "FL" => Ok(Label::ForwardLeft),
            "FR" => Ok(Label::ForwardRight),
            "BL" => Ok(Label::BackLeft),
            "BR" => Ok(Label::BackRight),
            other => Err(GameError::UnknownLabel(other.to_string())),
        }
    }
}

/// Absolute unit step on the board for `label` played by `player`.
///
/// Player B's labels are mirrored before the lookup and the row component
/// follows the player's forward direction.
#[inline]
pub fn to_absolute_direction(label: Label, player: Player) -> Delta {
    let label = match player {
        Player::A => label,
        Player::B => label.mirrored(),
    };
    let step = label.base_step();
    Delta::new(step.row * player.forward(), step.col)
}

/// Full displacement of a move, or None if `kind` has no such button.
pub fn movement(kind: PieceKind, label: Label, player: Player) -> Option<Delta> {
    if !kind.labels().contains(&label) {
        return None;
    }
    Some(to_absolute_direction(label, player).scale(kind.stride()))
}
