//! Win detection logic for tic-tac-toe.

use crate::position::Position;
use crate::types::{Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the eight lines that wins the game when uniformly marked.
///
/// Declaration order is the scan order used by [`check_winner`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Line {
    /// Top row.
    #[serde(rename = "row0")]
    #[strum(serialize = "row0")]
    Row0,
    /// Middle row.
    #[serde(rename = "row1")]
    #[strum(serialize = "row1")]
    Row1,
    /// Bottom row.
    #[serde(rename = "row2")]
    #[strum(serialize = "row2")]
    Row2,
    /// Left column.
    #[serde(rename = "col0")]
    #[strum(serialize = "col0")]
    Col0,
    /// Center column.
    #[serde(rename = "col1")]
    #[strum(serialize = "col1")]
    Col1,
    /// Right column.
    #[serde(rename = "col2")]
    #[strum(serialize = "col2")]
    Col2,
    /// Top-left to bottom-right.
    #[serde(rename = "diag-main")]
    #[strum(serialize = "diag-main")]
    DiagMain,
    /// Top-right to bottom-left.
    #[serde(rename = "diag-anti")]
    #[strum(serialize = "diag-anti")]
    DiagAnti,
}

impl Line {
    /// All lines in scan order: rows top-to-bottom, columns left-to-right, diagonals.
    pub const ALL: [Line; 8] = [
        Line::Row0,
        Line::Row1,
        Line::Row2,
        Line::Col0,
        Line::Col1,
        Line::Col2,
        Line::DiagMain,
        Line::DiagAnti,
    ];

    /// The three positions making up this line, in drawing order.
    pub fn positions(self) -> [Position; 3] {
        match self {
            Line::Row0 => [Position::TopLeft, Position::TopCenter, Position::TopRight],
            Line::Row1 => [Position::MiddleLeft, Position::Center, Position::MiddleRight],
            Line::Row2 => [
                Position::BottomLeft,
                Position::BottomCenter,
                Position::BottomRight,
            ],
            Line::Col0 => [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
            Line::Col1 => [Position::TopCenter, Position::Center, Position::BottomCenter],
            Line::Col2 => [
                Position::TopRight,
                Position::MiddleRight,
                Position::BottomRight,
            ],
            Line::DiagMain => [Position::TopLeft, Position::Center, Position::BottomRight],
            Line::DiagAnti => [Position::TopRight, Position::Center, Position::BottomLeft],
        }
    }
}

/// A completed line and the mark that completed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Win {
    /// The winning mark.
    pub mark: Mark,
    /// The line the mark completed.
    pub line: Line,
}

/// Checks if there is a winner on the board.
///
/// Returns the first line in [`Line::ALL`] order whose three squares hold the
/// same mark, or `None`. Lines of empty squares never count.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Win> {
    Line::ALL.into_iter().find_map(|line| {
        let [a, b, c] = line.positions();
        match board.get(a) {
            Square::Occupied(mark) if board.get(b) == board.get(a) && board.get(c) == board.get(a) => {
                Some(Win { mark, line })
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(marks: &[(Position, Mark)]) -> Board {
        let mut board = Board::new();
        for (pos, mark) in marks {
            board.set(*pos, Square::Occupied(*mark));
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::X),
            (Position::TopRight, Mark::X),
        ]);
        assert_eq!(
            check_winner(&board),
            Some(Win {
                mark: Mark::X,
                line: Line::Row0
            })
        );
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(&[
            (Position::TopRight, Mark::O),
            (Position::Center, Mark::O),
            (Position::BottomLeft, Mark::O),
        ]);
        assert_eq!(
            check_winner(&board),
            Some(Win {
                mark: Mark::O,
                line: Line::DiagAnti
            })
        );
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(&[(Position::TopLeft, Mark::X), (Position::TopCenter, Mark::X)]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::O),
            (Position::TopRight, Mark::X),
        ]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_rows_are_reported_before_columns() {
        // X X X
        // X . .
        // X . .
        let board = board_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::X),
            (Position::TopRight, Mark::X),
            (Position::MiddleLeft, Mark::X),
            (Position::BottomLeft, Mark::X),
        ]);
        assert_eq!(check_winner(&board).map(|w| w.line), Some(Line::Row0));
    }

    #[test]
    fn test_columns_are_reported_before_diagonals() {
        // . X O
        // . X O
        // O X .
        let board = board_with(&[
            (Position::TopCenter, Mark::X),
            (Position::Center, Mark::X),
            (Position::BottomCenter, Mark::X),
            (Position::TopRight, Mark::O),
            (Position::MiddleRight, Mark::O),
            (Position::BottomLeft, Mark::O),
        ]);
        assert_eq!(check_winner(&board).map(|w| w.line), Some(Line::Col1));
    }

    #[test]
    fn test_line_identifiers() {
        let names: Vec<String> = Line::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            names,
            ["row0", "row1", "row2", "col0", "col1", "col2", "diag-main", "diag-anti"]
        );
    }
}
