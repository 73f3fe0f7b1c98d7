//! Uniform random baseline

use rand::rngs::StdRng;

use crate::{
    Result,
    learning::random_move,
    ports::Learner,
    tictactoe::{GameState, Player},
    values::store::build_rng,
};

/// Plays a uniformly random legal move
#[derive(Debug, Clone)]
pub struct RandomAgent {
    player: Player,
    rng: StdRng,
    name: String,
}

impl RandomAgent {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            rng: build_rng(None),
            name: format!("Random-{player}"),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }
}

impl Learner for RandomAgent {
    fn player(&self) -> Player {
        self.player
    }

    fn select_move(&mut self, state: &GameState) -> Result<usize> {
        random_move(state, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = build_rng(Some(seed));
        Ok(())
    }
}
