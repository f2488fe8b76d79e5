//! Tic-tac-toe REST service.
//!
//! # Architecture
//!
//! - **Routes**: axum handlers for `newGame`, `makeMove`, `endGame` and lookups
//! - **Render**: SVG board images, returned as base64 `data:` URLs
//! - **Config**: defaults, TOML file, environment and CLI flags
//! - **Engine**: game rules and the registry live in `tictactoe_engine`
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_server::{ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! serve(ServerConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod error;
mod render;
mod routes;
mod wire;

pub use config::{ConfigError, ConfigOverrides, ServerConfig};
pub use error::{ApiError, ErrorBody, ErrorKind};
pub use render::{BoardRenderer, BoardSnapshot, RenderError, RenderedBoard, SvgRenderer};
pub use routes::{AppState, router};
pub use wire::{
    EndGameRequest, EndGameResponse, GameLookupResponse, GameResponse, GameView, HealthResponse,
    MakeMoveRequest, NewGameQuery, StatusView,
};

use std::sync::Arc;
use tictactoe_engine::{GameId, GameRegistry, GameState, Mark, MoveError};
use tracing::{info, instrument};

/// Builds the renderer described by `config`.
pub fn renderer_for(config: &ServerConfig) -> SvgRenderer {
    let renderer = SvgRenderer::new(*config.cell_size());
    match config.export_dir() {
        Some(dir) => renderer.with_export_dir(dir),
        None => renderer,
    }
}

/// Builds the application with a fresh registry.
pub fn app(config: &ServerConfig) -> axum::Router {
    let state = AppState::new(Arc::new(GameRegistry::new()), Arc::new(renderer_for(config)));
    router(state)
}

/// Binds the configured address and serves until the process exits.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let app = app(&config);
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(addr = %listener.local_addr()?, "Server ready");
    info!("Endpoints: GET /newGame, PUT /makeMove, PUT /endGame, GET /games/{{id}}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
            }
        })
        .await?;
    Ok(())
}

/// Plays `moves` on a fresh game with `first` moving first.
///
/// Stops at the first rejected move.
#[instrument]
pub fn replay(first: Mark, moves: &[usize]) -> Result<GameState, MoveError> {
    let mut state = GameState::new(GameId::new(1), first);
    for &idx in moves {
        state.apply_move(idx)?;
    }
    Ok(state)
}
