//! WASM bindings for chase-core
//!
//! Provides a JavaScript-friendly API for the game logic. Every intent
//! returns either `{ ok: ... }` or `{ error: { code, detail } }`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::view::{history_view, movement_guide};
use crate::{Game, GameError, Label, PieceId};

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Reply<T> {
    Ok(T),
    Error { code: &'static str, detail: String },
}

fn reply<T: Serialize>(result: Result<T, GameError>) -> JsValue {
    let reply = match result {
        Ok(value) => Reply::Ok(value),
        Err(err) => Reply::Error {
            code: err.code(),
            detail: err.to_string(),
        },
    };
    serde_wasm_bindgen::to_value(&reply).unwrap_or(JsValue::NULL)
}

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game in the placement phase
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    #[wasm_bindgen(js_name = startPlacement)]
    pub fn start_placement(&mut self) -> JsValue {
        self.inner.start_placement();
        self.state()
    }

    /// Place the next piece of the placing player
    pub fn place(&mut self, row: u8, col: u8) -> JsValue {
        reply(self.inner.place(row, col))
    }

    #[wasm_bindgen(js_name = beginGame)]
    pub fn begin_game(&mut self) -> JsValue {
        reply(self.inner.begin_game())
    }

    /// Select a piece by id ("A-P1") and get its legal moves
    pub fn select(&mut self, piece: &str) -> JsValue {
        reply(piece.parse::<PieceId>().and_then(|id| self.inner.select(id)))
    }

    /// Select the current player's piece on a clicked cell
    #[wasm_bindgen(js_name = selectAt)]
    pub fn select_at(&mut self, row: u8, col: u8) -> JsValue {
        reply(self.inner.select_at(row, col))
    }

    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self, piece: &str) -> JsValue {
        reply(piece.parse::<PieceId>().and_then(|id| self.inner.legal_moves(id)))
    }

    /// Move a piece by a button label ("L", "FR", ...)
    #[wasm_bindgen(js_name = "move")]
    pub fn move_piece(&mut self, piece: &str, label: &str) -> JsValue {
        let result = piece
            .parse::<PieceId>()
            .and_then(|id| Ok((id, label.parse::<Label>()?)))
            .and_then(|(id, label)| self.inner.move_piece(id, label));
        reply(result)
    }

    pub fn restart(&mut self) -> JsValue {
        self.inner.restart();
        self.state()
    }

    /// Full snapshot for redrawing the page
    pub fn state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.view()).unwrap_or(JsValue::NULL)
    }

    pub fn history(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&history_view(self.inner.history())).unwrap_or(JsValue::NULL)
    }

    pub fn guide() -> JsValue {
        serde_wasm_bindgen::to_value(&movement_guide()).unwrap_or(JsValue::NULL)
    }

    /// Board as a text grid, for the console
    pub fn render(&self) -> String {
        self.inner.board().to_string()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
