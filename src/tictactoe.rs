//! Tic-Tac-Toe game implementation

pub mod board;
pub mod lines;
pub mod symmetry;

pub use board::{Cell, GameState, GameStatus, Player};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use symmetry::D4Transform;
