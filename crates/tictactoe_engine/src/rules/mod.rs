//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). They never mutate and can
//! be evaluated at any point in a game.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{Line, Win, check_winner};
