use rand::rngs::StdRng;

use crate::{
    Result,
    learning::{LearningConfig, epsilon_greedy},
    tictactoe::{GameState, Player},
    values::{ValueStore, store::build_rng},
};

/// Shared state of every value-driven agent: the side, its table, the
/// hyperparameters and a move RNG kept apart from the store's init RNG.
#[derive(Debug, Clone)]
pub(crate) struct ValueCore {
    pub player: Player,
    pub store: ValueStore,
    pub config: LearningConfig,
    rng: StdRng,
    rng_seed: Option<u64>,
    explored: u64,
}

impl ValueCore {
    pub fn new(player: Player, store: ValueStore, config: LearningConfig) -> Self {
        Self {
            player,
            store,
            config,
            rng: build_rng(None),
            rng_seed: None,
            explored: 0,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
        self.rng_seed = Some(seed);
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn explored(&self) -> u64 {
        self.explored
    }

    pub fn select(&mut self, state: &GameState) -> Result<usize> {
        let choice = epsilon_greedy(
            &mut self.store,
            state,
            self.player,
            self.config.epsilon,
            &mut self.rng,
        )?;
        if choice.explored {
            self.explored += 1;
        }
        Ok(choice.position)
    }
}
