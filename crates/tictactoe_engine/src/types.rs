//! Core domain types for tic-tac-toe.

use crate::position::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark a player places on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum Mark {
    /// Mark X.
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Picks a mark with a fair 50/50 coin flip.
    #[instrument]
    pub fn coin_flip() -> Self {
        if rand::random::<bool>() { Mark::X } else { Mark::O }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark on this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Places a square. Only the engine writes to the board.
    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Checks if every square is occupied.
    pub fn is_full(&self) -> bool {
        crate::rules::is_full(self)
    }

    /// Number of occupied squares.
    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Returns all squares as an array.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// The board as three rows of optional marks.
    pub fn rows(&self) -> [[Option<Mark>; 3]; 3] {
        let mut rows = [[None; 3]; 3];
        for pos in Position::ALL {
            rows[pos.row()][pos.col()] = self.get(pos).mark();
        }
        rows
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their 0-based index.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => pos.to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_alternates() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_mark_parses_from_str() {
        assert_eq!("X".parse::<Mark>().ok(), Some(Mark::X));
        assert_eq!("O".parse::<Mark>().ok(), Some(Mark::O));
        assert!("Z".parse::<Mark>().is_err());
    }

    #[test]
    fn test_rows_layout() {
        let mut board = Board::new();
        board.set(Position::TopRight, Square::Occupied(Mark::X));
        board.set(Position::BottomLeft, Square::Occupied(Mark::O));

        let rows = board.rows();
        assert_eq!(rows[0], [None, None, Some(Mark::X)]);
        assert_eq!(rows[1], [None, None, None]);
        assert_eq!(rows[2], [Some(Mark::O), None, None]);
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Mark::O));
        assert_eq!(board.display(), "0|1|2\n-+-+-\n3|O|5\n-+-+-\n6|7|8");
    }
}
