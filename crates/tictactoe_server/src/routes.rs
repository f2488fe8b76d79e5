//! REST endpoints.
//!
//! Handlers validate input, run exactly one engine operation under the
//! game's lock, then render from a snapshot after the lock is released.

use crate::error::ApiError;
use crate::render::{BoardRenderer, BoardSnapshot};
use crate::wire::{
    EndGameRequest, EndGameResponse, GameLookupResponse, GameResponse, GameView, HealthResponse,
    MakeMoveRequest, NewGameQuery,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use std::sync::Arc;
use tictactoe_engine::{GameId, GameRegistry, GameState, GameStatus, MoveError, Position};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<GameRegistry>,
    renderer: Arc<dyn BoardRenderer>,
}

impl AppState {
    /// Creates handler state around a registry and a renderer.
    pub fn new(registry: Arc<GameRegistry>, renderer: Arc<dyn BoardRenderer>) -> Self {
        Self { registry, renderer }
    }

    /// The live games.
    pub fn registry(&self) -> &Arc<GameRegistry> {
        &self.registry
    }

    /// Renders the game and packages it with `message`.
    ///
    /// A render failure is reported in the body; the game is unaffected.
    async fn respond(&self, message: String, state: &GameState) -> GameResponse {
        let (board_image, render_error) =
            match self.renderer.render(&BoardSnapshot::of(state)).await {
                Ok(image) => (Some(image.to_data_url()), None),
                Err(e) => {
                    warn!(game_id = %state.id(), error = %e, "Board rendering failed");
                    (None, Some(e.to_string()))
                }
            };
        GameResponse {
            message,
            board_image,
            render_error,
            game: GameView::from(state),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/newGame", get(new_game))
        .route("/makeMove", put(make_move))
        .route("/endGame", put(end_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/board", get(board_image))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /newGame`
#[instrument(skip_all)]
async fn new_game(
    State(app): State<AppState>,
    query: Result<Query<NewGameQuery>, QueryRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Query(query) = query?;
    let state = app.registry.create_game(query.first_player).snapshot();

    info!(game_id = %state.id(), first_player = %state.first_player(), "New game started");
    let message = format!(
        "New game {} started. Player {} moves first.",
        state.id(),
        state.first_player()
    );
    Ok(Json(app.respond(message, &state).await))
}

/// Human-readable outcome for the game's current status.
fn status_message(state: &GameState) -> String {
    match state.status() {
        GameStatus::InProgress => {
            format!("Move accepted. Player {} to move.", state.current_turn())
        }
        GameStatus::Won(win) => format!("Player {} wins on {}!", win.mark, win.line),
        GameStatus::Drawn => "Game ended in a draw!".to_string(),
        GameStatus::Ended => format!("Game {} ended.", state.id()),
    }
}

/// `PUT /makeMove`
#[instrument(skip_all)]
async fn make_move(
    State(app): State<AppState>,
    body: Result<Json<MakeMoveRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(req) = body?;
    let game_id = req
        .game_id
        .map(GameId::new)
        .ok_or_else(|| ApiError::validation("Missing field: gameId"))?;
    let position = req
        .position
        .ok_or_else(|| ApiError::validation("Missing field: position"))?;
    let index = usize::try_from(position).map_err(|_| {
        ApiError::validation(format!("Position {} is out of range (expected 0-8)", position))
    })?;
    if Position::from_index(index).is_none() {
        return Err(MoveError::OutOfRange(index).into());
    }

    let handle = app.registry.find(game_id)?;
    let state = handle.with(|game| game.apply_move(index).cloned())?;

    let message = status_message(&state);

    if state.status().is_terminal() {
        // Completed games leave the registry; the final state is in this response.
        if let Err(e) = app.registry.remove(game_id) {
            debug!(error = %e, "Completed game already removed");
        }
    }

    info!(%game_id, index, status = ?state.status(), "Move completed successfully");
    Ok(Json(app.respond(message, &state).await))
}

/// `PUT /endGame`
#[instrument(skip_all)]
async fn end_game(
    State(app): State<AppState>,
    body: Result<Json<EndGameRequest>, JsonRejection>,
) -> Result<Json<EndGameResponse>, ApiError> {
    let Json(req) = body?;
    let game_id = req
        .game_id
        .map(GameId::new)
        .ok_or_else(|| ApiError::validation("Missing field: gameId"))?;

    let handle = app.registry.find(game_id)?;
    handle.with(|game| {
        game.end();
    });
    let state = app.registry.remove(game_id)?;

    info!(%game_id, moves = state.history().len(), "Game ended");
    Ok(Json(EndGameResponse {
        message: status_message(&state),
        game: GameView::from(&state),
    }))
}

/// `GET /games/{id}`
#[instrument(skip_all)]
async fn get_game(
    State(app): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<GameLookupResponse>, ApiError> {
    let Path(id) = id?;
    let state = app.registry.find(GameId::new(id))?.snapshot();
    Ok(Json(GameLookupResponse {
        game: GameView::from(&state),
    }))
}

/// `GET /games/{id}/board`
#[instrument(skip_all)]
async fn board_image(
    State(app): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let state = app.registry.find(GameId::new(id))?.snapshot();
    let image = app.renderer.render(&BoardSnapshot::of(&state)).await?;
    Ok(([(header::CONTENT_TYPE, image.mime())], image.into_bytes()))
}

/// `GET /health`
async fn health(State(app): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_games: app.registry.len(),
    })
}
