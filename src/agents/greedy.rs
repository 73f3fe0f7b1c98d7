//! Frozen greedy player

use crate::{
    Result,
    learning::greedy_move,
    ports::Learner,
    tictactoe::{GameState, Player},
    values::ValueStore,
};

/// Always plays the best afterstate of a fixed table and never learns.
///
/// Backed by the solver's table this is an optimal player.
#[derive(Debug, Clone)]
pub struct GreedyAgent {
    player: Player,
    store: ValueStore,
    name: String,
}

impl GreedyAgent {
    pub fn new(player: Player, store: ValueStore) -> Self {
        Self {
            player,
            store,
            name: format!("Greedy-{player}"),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }
}

impl Learner for GreedyAgent {
    fn player(&self) -> Player {
        self.player
    }

    fn select_move(&mut self, state: &GameState) -> Result<usize> {
        greedy_move(&mut self.store, state, self.player)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value_store(&self) -> Option<&ValueStore> {
        Some(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_winning_move() {
        // X: 7 8, O: 4 5. X to move; 9 completes the top row.
        let state = GameState::from_label("XX./OO./...").unwrap();
        let mut store = ValueStore::deterministic(0.0);
        store.set(&state.simulate(9, Player::X).unwrap(), 1.0);

        let mut agent = GreedyAgent::new(Player::X, store);
        assert_eq!(agent.select_move(&state).unwrap(), 9);
    }

    #[test]
    fn learning_is_a_no_op() {
        let mut agent = GreedyAgent::new(Player::O, ValueStore::deterministic(0.5));
        let state = GameState::new().simulate(5, Player::X).unwrap();
        agent.learn(&[state], -1.0).unwrap();
        assert!(agent.store().is_empty());
    }
}
