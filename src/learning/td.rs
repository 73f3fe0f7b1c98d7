//! TD(0) update over one episode's afterstates

use super::config::LearningConfig;
use crate::{tictactoe::GameState, values::ValueStore};

/// Apply TD(0) to the afterstates of one agent, last to first.
///
/// The final afterstate is set to exactly `reward` when it is terminal and
/// moved toward `reward` by α otherwise. Every earlier afterstate
/// bootstraps from its successor: `v ← v + α(γ·v_next − v)`, with no
/// intermediate reward. Unseen states are initialised by the store first.
/// An empty slice is a no-op.
pub fn td_update(
    store: &mut ValueStore,
    afterstates: &[GameState],
    reward: f64,
    config: &LearningConfig,
) {
    let Some((last, earlier)) = afterstates.split_last() else {
        return;
    };
    let LearningConfig { alpha, gamma, .. } = *config;

    let mut next_value = if last.is_terminal() {
        store.set(last, reward);
        reward
    } else {
        store.update(last, |v| v + alpha * (reward - v))
    };

    for state in earlier.iter().rev() {
        next_value = store.update(state, |v| v + alpha * (gamma * next_value - v));
    }
}
