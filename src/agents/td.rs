//! TD(0) learner over afterstate values

use super::value_core::ValueCore;
use crate::{
    Result,
    learning::{LearningConfig, td_update},
    ports::Learner,
    tictactoe::{GameState, Player},
    values::ValueStore,
};

/// ε-greedy agent that bootstraps each afterstate from its successor
#[derive(Debug, Clone)]
pub struct TdAgent {
    core: ValueCore,
    name: String,
}

impl TdAgent {
    pub fn new(player: Player, store: ValueStore, config: LearningConfig) -> Self {
        Self {
            core: ValueCore::new(player, store, config),
            name: format!("TD(0)-{player}"),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.reseed(seed);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(&self) -> &LearningConfig {
        &self.core.config
    }

    pub fn store(&self) -> &ValueStore {
        &self.core.store
    }

    pub fn store_mut(&mut self) -> &mut ValueStore {
        &mut self.core.store
    }

    pub fn into_store(self) -> ValueStore {
        self.core.store
    }

    /// Moves taken at random so far.
    pub fn explored_moves(&self) -> u64 {
        self.core.explored()
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.core.rng_seed()
    }
}

impl Learner for TdAgent {
    fn player(&self) -> Player {
        self.core.player
    }

    fn select_move(&mut self, state: &GameState) -> Result<usize> {
        self.core.select(state)
    }

    fn learn(&mut self, afterstates: &[GameState], reward: f64) -> Result<()> {
        td_update(&mut self.core.store, afterstates, reward, &self.core.config);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value_store(&self) -> Option<&ValueStore> {
        Some(&self.core.store)
    }

    fn set_epsilon(&mut self, epsilon: f64) {
        self.core.config.epsilon = epsilon;
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.core.reseed(seed);
        Ok(())
    }
}
