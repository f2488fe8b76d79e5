//! Game state engine for a single tic-tac-toe board.

use crate::position::Position;
use crate::rules::{self, Win};
use crate::types::{Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier of a game, assigned at creation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    /// Wraps a raw identifier.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Current status of the game.
///
/// `InProgress` is the only non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Win),
    /// Board filled with no winner.
    Drawn,
    /// Game was ended before completion.
    Ended,
}

impl GameStatus {
    /// Returns true once no further moves are accepted.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the win, if the game was won.
    pub fn win(&self) -> Option<Win> {
        match self {
            GameStatus::Won(win) => Some(*win),
            _ => None,
        }
    }
}

/// Error that can occur when applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The index does not name a square.
    #[display("Position {} is out of range (expected 0-8)", _0)]
    OutOfRange(usize),

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game is no longer in progress.
    #[display("Game is already over ({:?})", _0)]
    GameOver(GameStatus),
}

impl MoveError {
    /// True for malformed input, false for moves that break the rules.
    pub fn is_validation(&self) -> bool {
        matches!(self, MoveError::OutOfRange(_))
    }
}

impl std::error::Error for MoveError {}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    id: GameId,
    board: Board,
    first_player: Mark,
    current_turn: Mark,
    status: GameStatus,
    /// Positions in the order they were played.
    history: Vec<Position>,
}

impl GameState {
    /// Creates a game with an empty board; `first_player` moves first.
    #[instrument]
    pub fn new(id: GameId, first_player: Mark) -> Self {
        debug!(%id, %first_player, "Creating game state");
        Self {
            id,
            board: Board::new(),
            first_player,
            current_turn: first_player,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Returns the game identifier.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark that moved first.
    pub fn first_player(&self) -> Mark {
        self.first_player
    }

    /// Returns the mark that moved second.
    pub fn second_player(&self) -> Mark {
        self.first_player.opponent()
    }

    /// Returns the mark whose move is next (or who made the winning move).
    pub fn current_turn(&self) -> Mark {
        self.current_turn
    }

    /// Returns the game status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Places the current player's mark at `index` (0-8, row-major).
    ///
    /// On failure nothing is changed. On success the status is re-evaluated:
    /// a completed line wins (the turn stays with the winner), a full board
    /// draws, otherwise the turn passes to the opponent.
    ///
    /// # Errors
    ///
    /// - [`MoveError::OutOfRange`] if `index` is not 0-8
    /// - [`MoveError::GameOver`] if the game is not in progress
    /// - [`MoveError::SquareOccupied`] if the square is taken
    #[instrument(skip(self), fields(game_id = %self.id, player = %self.current_turn))]
    pub fn apply_move(&mut self, index: usize) -> Result<&Self, MoveError> {
        let pos = Position::from_index(index).ok_or_else(|| {
            warn!(index, "Position out of range");
            MoveError::OutOfRange(index)
        })?;

        if self.status.is_terminal() {
            warn!(status = ?self.status, "Move attempted on finished game");
            return Err(MoveError::GameOver(self.status));
        }

        if !self.board.is_empty(pos) {
            warn!(position = %pos, "Square already occupied");
            return Err(MoveError::SquareOccupied(pos));
        }

        self.board.set(pos, Square::Occupied(self.current_turn));
        self.history.push(pos);

        if let Some(win) = self.check_winner() {
            info!(mark = %win.mark, line = %win.line, "Game won");
            self.status = GameStatus::Won(win);
        } else if self.is_full() {
            info!("Game drawn");
            self.status = GameStatus::Drawn;
        } else {
            self.current_turn = self.current_turn.opponent();
        }

        debug!(position = %pos, status = ?self.status, "Move applied");
        Ok(self)
    }

    /// Returns the first completed line in scan order, if any.
    pub fn check_winner(&self) -> Option<Win> {
        rules::check_winner(&self.board)
    }

    /// Returns true if no empty squares remain.
    pub fn is_full(&self) -> bool {
        rules::is_full(&self.board)
    }

    /// Ends the game.
    ///
    /// An in-progress game becomes `Ended` (a forfeit). A game that already
    /// reached a terminal status keeps it.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn end(&mut self) -> &GameStatus {
        if self.status == GameStatus::InProgress {
            info!(moves = self.history.len(), "Ending game in progress");
            self.status = GameStatus::Ended;
        } else {
            debug!(status = ?self.status, "Game already finished");
        }
        &self.status
    }
}
