//! Monte Carlo update over one episode's afterstates

use super::config::LearningConfig;
use crate::{
    tictactoe::GameState,
    values::{Averaging, ValueStore},
};

/// Discounted return of the afterstate `steps_from_end` steps before the end.
pub fn discounted_return(reward: f64, gamma: f64, steps_from_end: usize) -> f64 {
    reward * gamma.powi(steps_from_end as i32)
}

/// Fold the episode's returns into the store using the store's [`Averaging`] policy.
///
/// The last afterstate receives `reward`, the one before it `γ·reward`, and
/// so on. Unseen states are initialised by the store before averaging; under
/// [`Averaging::SampleMean`] their initial value carries zero weight.
pub fn monte_carlo_update(
    store: &mut ValueStore,
    afterstates: &[GameState],
    reward: f64,
    config: &LearningConfig,
) {
    let averaging = store.averaging();

    for (steps_from_end, state) in afterstates.iter().rev().enumerate() {
        let target = discounted_return(reward, config.gamma, steps_from_end);
        let entry = store.entry_mut(state);
        match averaging {
            Averaging::Exponential => {
                entry.value += config.alpha * (target - entry.value);
            }
            Averaging::SampleMean => {
                let visits = entry.visits as f64;
                entry.value = (entry.value * visits + target) / (visits + 1.0);
                entry.visits += 1;
            }
        }
    }
}
