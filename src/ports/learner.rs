//! Learner port - abstraction over agents that play (and possibly learn)
//!
//! The match driver and training session only talk to agents through this
//! trait, so greedy players, TD(0) and Monte Carlo learners, and random
//! baselines are interchangeable.

use crate::{
    Result,
    tictactoe::{GameState, Player},
    values::ValueStore,
};

/// Unified interface for every agent
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::{
///     agents::TdAgent,
///     learning::LearningConfig,
///     ports::Learner,
///     tictactoe::{GameState, Player},
///     values::ValueStore,
/// };
///
/// let mut agent = TdAgent::new(Player::X, ValueStore::learning(), LearningConfig::default());
/// let position = agent.select_move(&GameState::new()).unwrap();
/// assert!((1..=9).contains(&position));
/// ```
pub trait Learner: Send {
    /// Side this agent plays.
    fn player(&self) -> Player;

    /// Pick a keypad position (1-9) for the given board.
    ///
    /// # Errors
    ///
    /// Returns an error if no legal move exists.
    fn select_move(&mut self, state: &GameState) -> Result<usize>;

    /// Update after an episode.
    ///
    /// # Parameters
    ///
    /// * `afterstates` - Boards right after each of this agent's moves, in order
    /// * `reward` - Terminal reward from X's point of view (+1, 0, -1)
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for frozen and random players.
    fn learn(&mut self, _afterstates: &[GameState], _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Get the learner's name, used in logs and reports.
    fn name(&self) -> &str;

    /// Value table backing the agent, if it has one.
    fn value_store(&self) -> Option<&ValueStore> {
        None
    }

    /// Override the exploration rate. Agents without exploration ignore it.
    fn set_epsilon(&mut self, _epsilon: f64) {}

    /// Reseed the agent's move-selection RNG for reproducible runs.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
