//! Tic-tac-toe game state engine.
//!
//! # Architecture
//!
//! - **Types**: marks, squares and the 3x3 [`Board`]
//! - **Rules**: pure win and draw detection over a board
//! - **Game**: [`GameState`] validates and applies moves for one game
//! - **Registry**: [`GameRegistry`] owns every live game behind a per-game lock
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{GameRegistry, GameStatus, Mark};
//!
//! let registry = GameRegistry::new();
//! let game = registry.create_game(Some(Mark::X));
//!
//! game.with(|state| {
//!     for idx in [0, 3, 1, 4, 2] {
//!         state.apply_move(idx).unwrap();
//!     }
//!     assert!(matches!(state.status(), GameStatus::Won(_)));
//! });
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod game;
mod position;
mod registry;
pub mod rules;
mod types;

pub use game::{GameId, GameState, GameStatus, MoveError};
pub use position::Position;
pub use registry::{GameHandle, GameRegistry, RegistryError};
pub use rules::{Line, Win};
pub use types::{Board, Mark, Square};
