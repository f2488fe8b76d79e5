//! JSON request and response bodies.

use serde::{Deserialize, Serialize};
use tictactoe_engine::{GameState, GameStatus, Line, Mark};

/// Serialized game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// Game identifier.
    pub game_id: u64,
    /// Rows top to bottom; `null` for empty squares.
    pub board: [[Option<Mark>; 3]; 3],
    /// Mark that moved first.
    pub first_player: Mark,
    /// Mark that moved second.
    pub second_player: Mark,
    /// Mark to move next, or the winner once won.
    pub current_turn: Mark,
    /// Lifecycle status.
    pub status: StatusView,
    /// Winning mark, if any.
    pub winner: Option<Mark>,
    /// Winning line identifier, if any.
    pub winning_line: Option<Line>,
    /// Number of moves played.
    pub move_count: usize,
}

/// Flattened game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusView {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won,
    /// Game ended in a draw.
    Drawn,
    /// Game was ended early.
    Ended,
}

impl From<&GameState> for GameView {
    fn from(state: &GameState) -> Self {
        let win = state.status().win();
        Self {
            game_id: state.id().value(),
            board: state.board().rows(),
            first_player: state.first_player(),
            second_player: state.second_player(),
            current_turn: state.current_turn(),
            status: match state.status() {
                GameStatus::InProgress => StatusView::InProgress,
                GameStatus::Won(_) => StatusView::Won,
                GameStatus::Drawn => StatusView::Drawn,
                GameStatus::Ended => StatusView::Ended,
            },
            winner: win.map(|w| w.mark),
            winning_line: win.map(|w| w.line),
            move_count: state.history().len(),
        }
    }
}

/// Body of `PUT /makeMove`.
///
/// Fields are optional so that a missing field is reported as a validation
/// error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeMoveRequest {
    /// Target game.
    pub game_id: Option<u64>,
    /// Square index 0-8, row-major.
    pub position: Option<i64>,
}

/// Body of `PUT /endGame`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndGameRequest {
    /// Target game.
    pub game_id: Option<u64>,
}

/// Query string of `GET /newGame`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameQuery {
    /// Forces the first mover instead of flipping a coin.
    pub first_player: Option<Mark>,
}

/// Response to a request that may carry a board image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Board image as a base64 `data:` URL; `null` if rendering failed.
    pub board_image: Option<String>,
    /// Why the image is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_error: Option<String>,
    /// Game state after the request.
    pub game: GameView,
}

/// Response to `PUT /endGame`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndGameResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Final game state.
    pub game: GameView,
}

/// Response to `GET /games/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLookupResponse {
    /// Current game state.
    pub game: GameView,
}

/// Response to `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Number of live games.
    pub active_games: usize,
}
