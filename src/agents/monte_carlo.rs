//! Monte Carlo learner over afterstate values

use super::value_core::ValueCore;
use crate::{
    Result,
    learning::{LearningConfig, monte_carlo_update},
    ports::Learner,
    tictactoe::{GameState, Player},
    values::{Averaging, ValueStore},
};

/// ε-greedy agent that folds whole-episode discounted returns into its table
///
/// The averaging policy belongs to the store, so a table trained with
/// sample means keeps its visit counts across save and load.
#[derive(Debug, Clone)]
pub struct MonteCarloAgent {
    core: ValueCore,
    name: String,
}

impl MonteCarloAgent {
    pub fn new(player: Player, store: ValueStore, config: LearningConfig) -> Self {
        Self {
            core: ValueCore::new(player, store, config),
            name: format!("MC-{player}"),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.reseed(seed);
        self
    }

    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.core.store = self.core.store.with_averaging(averaging);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn averaging(&self) -> Averaging {
        self.core.store.averaging()
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

    pub fn explored_moves(&self) -> u64 {
        self.core.explored()
    }
}

impl Learner for MonteCarloAgent {
    fn player(&self) -> Player {
        self.core.player
    }

    fn select_move(&mut self, state: &GameState) -> Result<usize> {
        self.core.select(state)
    }

    fn learn(&mut self, afterstates: &[GameState], reward: f64) -> Result<()> {
        monte_carlo_update(&mut self.core.store, afterstates, reward, &self.core.config);
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
