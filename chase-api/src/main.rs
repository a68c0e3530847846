//! Chase Game Web API
//!
//! Serves the rules engine to a browser front end over JSON. The server keeps
//! a single in-memory game; requests are serialized through one mutex, so the
//! engine sees a strict sequence of intents.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use chase_core::view::{history_view, movement_guide, GuideEntry, HistoryEntryView};
use chase_core::{
    Game, GameError, GameView, Label, LegalMove, MoveOutcome, PieceId, PlacementOutcome, Player,
};

// =============================================================================
// Configuration
// =============================================================================

const DEFAULT_LOG_FILTER: &str = "chase_api=info,chase_core=info,tower_http=info";

/// HTTP server for the 5x5 chase game
#[derive(Parser, Debug)]
#[command(name = "chase-api")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "CHASE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "CHASE_PORT", default_value_t = 8000)]
    port: u16,
}

// =============================================================================
// Session State
// =============================================================================

/// Shared application state
#[derive(Default)]
struct AppStateInner {
    game: Mutex<Game>,
}

impl AppStateInner {
    /// Lock the game, ignoring poisoning.
    fn game(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type AppState = Arc<AppStateInner>;

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Deserialize)]
struct PlaceRequest {
    row: u8,
    col: u8,
}

/// Select by id, or by clicked cell.
#[derive(Deserialize)]
struct SelectRequest {
    piece: Option<String>,
    row: Option<u8>,
    col: Option<u8>,
}

#[derive(Deserialize)]
struct MoveRequest {
    piece: String,
    label: String,
}

#[derive(Serialize)]
struct PlaceResponse {
    placement: PlacementOutcome,
    game: GameView,
}

#[derive(Serialize)]
struct BeginResponse {
    first_player: Player,
    game: GameView,
}

#[derive(Serialize)]
struct SelectResponse {
    moves: Vec<LegalMove>,
    game: GameView,
}

#[derive(Serialize)]
struct MoveResponse {
    outcome: MoveOutcome,
    game: GameView,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

#[derive(Serialize)]
struct ErrorModel {
    code: String,
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorModel>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn reject(err: GameError) -> ApiError {
    debug!(code = err.code(), "rejected: {err}");
    let status = match err {
        GameError::NoSuchPiece(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorModel {
            code: err.code().to_string(),
            detail: err.to_string(),
        }),
    )
}

fn bad_request(detail: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorModel {
            code: "BadRequest".to_string(),
            detail: detail.to_string(),
        }),
    )
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn get_game(State(state): State<AppState>) -> Json<GameView> {
    Json(state.game().view())
}

async fn start_placement(State(state): State<AppState>) -> Json<GameView> {
    let mut game = state.game();
    game.start_placement();
    Json(game.view())
}

async fn place(
    State(state): State<AppState>,
    Json(req): Json<PlaceRequest>,
) -> ApiResult<PlaceResponse> {
    let mut game = state.game();
    let placement = game.place(req.row, req.col).map_err(reject)?;
    Ok(Json(PlaceResponse {
        placement,
        game: game.view(),
    }))
}

async fn begin(State(state): State<AppState>) -> ApiResult<BeginResponse> {
    let mut game = state.game();
    let first_player = game.begin_game().map_err(reject)?;
    Ok(Json(BeginResponse {
        first_player,
        game: game.view(),
    }))
}

async fn select(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> ApiResult<SelectResponse> {
    let mut game = state.game();
    let moves = match (req.piece, req.row, req.col) {
        (Some(piece), _, _) => {
            let id: PieceId = piece.parse().map_err(reject)?;
            game.select(id).map_err(reject)?
        }
        (None, Some(row), Some(col)) => game.select_at(row, col).map_err(reject)?,
        _ => return Err(bad_request("Must specify piece or row/col")),
    };
    Ok(Json(SelectResponse {
        moves,
        game: game.view(),
    }))
}

async fn get_moves(
    State(state): State<AppState>,
    Path(piece): Path<String>,
) -> ApiResult<Vec<LegalMove>> {
    let id: PieceId = piece.parse().map_err(reject)?;
    let moves = state.game().legal_moves(id).map_err(reject)?;
    Ok(Json(moves))
}

async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> ApiResult<MoveResponse> {
    let id: PieceId = req.piece.parse().map_err(reject)?;
    let label: Label = req.label.parse().map_err(reject)?;

    let mut game = state.game();
    let outcome = game.move_piece(id, label).map_err(reject)?;
    Ok(Json(MoveResponse {
        outcome,
        game: game.view(),
    }))
}

async fn restart(State(state): State<AppState>) -> Json<GameView> {
    let mut game = state.game();
    game.restart();
    Json(game.view())
}

async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryEntryView>> {
    Json(history_view(state.game().history()))
}

async fn get_guide() -> Json<Vec<GuideEntry>> {
    Json(movement_guide())
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/game", get(get_game))
        .route("/placement/start", post(start_placement))
        .route("/place", post(place))
        .route("/begin", post(begin))
        .route("/select", post(select))
        .route("/moves/{piece}", get(get_moves))
        .route("/move", post(make_move))
        .route("/restart", post(restart))
        .route("/history", get(get_history))
        .route("/guide", get(get_guide))
        .route("/health", get(health))
        .with_state(state)
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let state: AppState = Arc::new(AppStateInner::default());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Chase API running on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn place_all(state: &AppState) {
        for row in [0, 4] {
            for col in 0..5 {
                let (status, _) = call(state, "POST", "/place", Some(json!({ "row": row, "col": col }))).await;
                assert_eq!(status, StatusCode::OK);
            }
        }
    }

    #[tokio::test]
    async fn test_health() {
        let state = AppState::default();
        let (status, body) = call(&state, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_place_returns_prompt_and_view() {
        let state = AppState::default();
        let (status, body) = call(&state, "POST", "/place", Some(json!({ "row": 0, "col": 2 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["placement"]["piece"], "A-P1");
        assert_eq!(body["placement"]["pos"], json!([0, 2]));
        assert_eq!(body["game"]["prompt"], "Player A, place your A-P2");
    }

    #[tokio::test]
    async fn test_place_on_wrong_row_is_rejected() {
        let state = AppState::default();
        let (status, body) = call(&state, "POST", "/place", Some(json!({ "row": 3, "col": 0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "InvalidPlacementRow");
    }

    #[tokio::test]
    async fn test_begin_before_placement_done() {
        let state = AppState::default();
        let (status, body) = call(&state, "POST", "/begin", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "PlacementIncomplete");
    }

    #[tokio::test]
    async fn test_play_a_move() {
        let state = AppState::default();
        place_all(&state).await;

        let (status, body) = call(&state, "POST", "/begin", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_player"], "A");

        let (status, body) = call(&state, "POST", "/select", Some(json!({ "row": 0, "col": 0 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["moves"], json!([{ "label": "F", "to": [1, 0], "captures": [] }]));
        assert_eq!(body["game"]["selected"], "A-P1");

        let (status, body) = call(
            &state,
            "POST",
            "/move",
            Some(json!({ "piece": "A-P1", "label": "F" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"]["next_player"], "B");
        assert_eq!(body["game"]["current_player"], "B");
        assert_eq!(body["game"]["selected"], Value::Null);

        let (_, history) = call(&state, "GET", "/history", None).await;
        assert_eq!(history[0]["notation"], "A-P1: F");
    }

    #[tokio::test]
    async fn test_move_errors() {
        let state = AppState::default();
        place_all(&state).await;
        call(&state, "POST", "/begin", None).await;

        let (status, body) = call(&state, "POST", "/move", Some(json!({ "piece": "A-P1", "label": "X" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UnknownLabel");

        let (status, body) = call(&state, "POST", "/move", Some(json!({ "piece": "B-P1", "label": "F" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "NotYourPiece");

        let (status, body) = call(&state, "POST", "/move", Some(json!({ "piece": "A-P1", "label": "B" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "IllegalDestination");

        let (status, body) = call(&state, "GET", "/moves/Z-Q9", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MalformedPieceId");
    }

    #[tokio::test]
    async fn test_missing_piece_is_not_found() {
        let state = Arc::new(AppStateInner {
            game: Mutex::new(
                Game::from_pieces(
                    &[
                        ("A-P1".parse().unwrap(), chase_core::Pos::from_row_col(0, 0)),
                        ("B-P1".parse().unwrap(), chase_core::Pos::from_row_col(4, 4)),
                    ],
                    Player::A,
                )
                .unwrap(),
            ),
        });
        let (status, body) = call(&state, "GET", "/moves/A-H1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NoSuchPiece");
    }

    #[tokio::test]
    async fn test_select_requires_target() {
        let state = AppState::default();
        let (status, body) = call(&state, "POST", "/select", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BadRequest");
    }

    #[tokio::test]
    async fn test_restart_clears_board() {
        let state = AppState::default();
        place_all(&state).await;
        let (status, body) = call(&state, "POST", "/restart", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "placement");
        assert_eq!(body["pieces"], json!([]));
    }

    #[tokio::test]
    async fn test_guide() {
        let state = AppState::default();
        let (_, body) = call(&state, "GET", "/guide", None).await;
        assert_eq!(body[0]["kind"], "pawn");
        assert_eq!(body[2]["labels"], json!(["FL", "FR", "BL", "BR"]));
    }
}
