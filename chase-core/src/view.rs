//! Serializable snapshot of a game, shaped for a browser front end.

use serde::Serialize;

use crate::direction::Label;
use crate::game::{Game, GamePhase, MoveRecord};
use crate::piece::{PieceId, PieceKind};
use crate::{Player, Pos};

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PieceView {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: Player,
    pub pos: Pos,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PlacedView {
    #[serde(rename = "A")]
    pub a: u8,
    #[serde(rename = "B")]
    pub b: u8,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct HistoryEntryView {
    pub index: usize,
    /// Display form, e.g. `A-H1: F (Captured B-P2)`.
    pub notation: String,
    #[serde(flatten)]
    pub record: MoveRecord,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct GuideEntry {
    pub kind: PieceKind,
    pub labels: Vec<Label>,
    pub description: &'static str,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct GameView {
    pub phase: GamePhase,
    pub current_player: Player,
    pub selected: Option<PieceId>,
    pub placed: PlacedView,
    /// Placement prompt text, only during placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub pieces: Vec<PieceView>,
    pub winner: Option<Player>,
    pub history: Vec<HistoryEntryView>,
}

impl Game {
    /// Snapshot of everything a UI needs to redraw.
    pub fn view(&self) -> GameView {
        GameView {
            phase: self.phase(),
            current_player: self.current_player(),
            selected: self.selected(),
            placed: PlacedView {
                a: self.placed(Player::A),
                b: self.placed(Player::B),
            },
            prompt: self.prompt().map(|p| p.to_string()),
            pieces: self
                .board()
                .pieces()
                .map(|p| PieceView {
                    id: p.id,
                    kind: p.kind,
                    owner: p.owner,
                    pos: p.pos,
                })
                .collect(),
            winner: self.winner(),
            history: history_view(self.history()),
        }
    }
}

pub fn history_view(history: &[MoveRecord]) -> Vec<HistoryEntryView> {
    history
        .iter()
        .enumerate()
        .map(|(i, record)| HistoryEntryView {
            index: i + 1,
            notation: record.to_string(),
            record: record.clone(),
        })
        .collect()
}

/// Movement guide shown before play starts.
pub fn movement_guide() -> Vec<GuideEntry> {
    PieceKind::all()
        .map(|kind| GuideEntry {
            kind,
            labels: kind.labels().to_vec(),
            description: kind.description(),
        })
        .collect()
}
