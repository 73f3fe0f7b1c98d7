//! Observer port - training event hooks
//!
//! Observers collect progress, statistics or logs during a training session
//! without the session knowing about any output format.

use super::Learner;
use crate::{Result, tictactoe::GameStatus};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_games)` - once
/// 2. `on_game_end(game_num, status, opening)` - after every game, once the
///    learners have been updated
/// 3. `on_learners_updated(game_num, x, o)` - right after `on_game_end`,
///    with read access to both learners
/// 4. `on_training_end()` - once
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each game.
    ///
    /// * `game_num` - 1-based game counter
    /// * `status` - Final status of the game
    /// * `opening` - Forced first move, if the session imposed one
    fn on_game_end(
        &mut self,
        _game_num: usize,
        _status: GameStatus,
        _opening: Option<usize>,
    ) -> Result<()> {
        Ok(())
    }

    /// Inspect both learners after their updates for game `game_num`.
    fn on_learners_updated(
        &mut self,
        _game_num: usize,
        _x: &dyn Learner,
        _o: &dyn Learner,
    ) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: Observer + ?Sized> Observer for &mut T {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        (**self).on_training_start(total_games)
    }

    fn on_game_end(
        &mut self,
        game_num: usize,
        status: GameStatus,
        opening: Option<usize>,
    ) -> Result<()> {
        (**self).on_game_end(game_num, status, opening)
    }

    fn on_learners_updated(
        &mut self,
        game_num: usize,
        x: &dyn Learner,
        o: &dyn Learner,
    ) -> Result<()> {
        (**self).on_learners_updated(game_num, x, o)
    }

    fn on_training_end(&mut self) -> Result<()> {
        (**self).on_training_end()
    }
}
