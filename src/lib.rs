//! Value learning for Tic-Tac-Toe
//!
//! This crate provides:
//! - A board with keypad move numbering and canonical forms under the 8
//!   symmetries of the square
//! - A value table keyed by canonical state, with JSON and MessagePack persistence
//! - TD(0) and Monte Carlo update rules with ε-greedy afterstate selection
//! - An exact backward-induction solver used as ground truth
//! - A match driver, self-play training sessions and evaluation against the solver
//!
//! Values are always from X's point of view: X wins are +1, O wins -1, draws 0.

pub mod agents;
pub mod cli;
pub mod error;
pub mod learning;
pub mod pipeline;
pub mod ports;
pub mod solver;
pub mod tictactoe;
pub mod types;
pub mod values;

pub use error::{Error, Result};
pub use solver::{ExactSolver, Solution};
pub use tictactoe::{GameState, GameStatus, Player};
pub use types::Position;
pub use values::ValueStore;
