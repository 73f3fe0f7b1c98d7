//! CLI infrastructure for the tictactoe-rl toolkit
//!
//! Training, solving and evaluation commands on top of the library.

pub mod commands;
pub mod output;
