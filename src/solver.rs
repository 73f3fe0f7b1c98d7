//! Exact values by backward induction over the reachable game graph
//!
//! The graph is built ply by ply from the empty board. Every canonical
//! state appears in exactly one layer because a layer is the set of boards
//! with the same number of marks. Values are then filled in from ply 9 down
//! to ply 0:
//!
//! - terminal state: its reward (draw 0, X win +1, O win -1)
//! - otherwise: `γ · max` over children when X is to move, `γ · min` when O is
//!
//! With γ = 0.9 the empty board solves to exactly 0.0: every line of
//! optimal play ends in a draw worth 0, and scaling 0 by γ leaves it 0.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    tictactoe::{GameState, GameStatus, Player},
    values::ValueStore,
};

/// Discount applied once per ply transition
pub const DEFAULT_GAMMA: f64 = 0.9;

/// One ply of the state graph: canonical state to its children
type Layer = HashMap<GameState, Vec<GameState>>;

/// Backward-induction solver
#[derive(Debug, Clone, Copy)]
pub struct ExactSolver {
    gamma: f64,
}

impl ExactSolver {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Build every reachable layer. Terminal states have no children.
    fn build_layers() -> Vec<Layer> {
        let mut root = Layer::new();
        root.insert(GameState::new(), Vec::new());
        let mut layers = vec![root];

        for ply in 0..9 {
            let player = if ply % 2 == 0 { Player::X } else { Player::O };
            let mut next = Layer::new();

            for (state, children) in layers[ply].iter_mut() {
                if state.is_terminal() {
                    continue;
                }
                for position in state.legal_moves() {
                    // Legal moves of a running board always apply.
                    let Ok(child) = state.simulate(position, player) else {
                        continue;
                    };
                    if !children.contains(&child) {
                        children.push(child);
                    }
                    next.entry(child).or_default();
                }
            }

            debug!("ply {}: {} canonical states", ply + 1, next.len());
            layers.push(next);
        }

        layers
    }

    /// Solve the whole game.
    pub fn solve(&self) -> Solution {
        let layers = Self::build_layers();
        let mut values: HashMap<GameState, f64> = HashMap::new();

        for (ply, layer) in layers.iter().enumerate().rev() {
            let maximizing = ply % 2 == 0;
            for (state, children) in layer {
                let value = if children.is_empty() {
                    state.terminal_status().reward().unwrap_or(0.0)
                } else {
                    let child_values = children.iter().filter_map(|child| values.get(child));
                    let best = if maximizing {
                        child_values.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
                    } else {
                        child_values.fold(f64::INFINITY, |acc, &v| acc.min(v))
                    };
                    self.gamma * best
                };
                values.insert(*state, value);
            }
        }

        let layer_sizes = layers.iter().map(HashMap::len).collect();
        info!(
            "solved {} canonical states (gamma = {})",
            values.len(),
            self.gamma
        );

        Solution {
            gamma: self.gamma,
            values,
            layer_sizes,
        }
    }
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}

/// Terminal canonical states by result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalCounts {
    pub draws: usize,
    pub x_wins: usize,
    pub o_wins: usize,
}

impl TerminalCounts {
    pub fn total(&self) -> usize {
        self.draws + self.x_wins + self.o_wins
    }
}

/// Exact value of every reachable canonical state
#[derive(Debug, Clone)]
pub struct Solution {
    gamma: f64,
    values: HashMap<GameState, f64>,
    layer_sizes: Vec<usize>,
}

impl Solution {
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Exact value, or `None` for an unreachable board.
    pub fn value(&self, state: &GameState) -> Option<f64> {
        self.values.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Canonical state count per ply, index 0 being the empty board.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn terminal_counts(&self) -> TerminalCounts {
        let mut counts = TerminalCounts::default();
        for state in self.values.keys() {
            match state.terminal_status() {
                GameStatus::Running => {}
                GameStatus::Draw => counts.draws += 1,
                GameStatus::Win(Player::X) => counts.x_wins += 1,
                GameStatus::Win(Player::O) => counts.o_wins += 1,
            }
        }
        counts
    }

    /// Optimal keypad move for the side to move. Ties keep the lowest position.
    pub fn best_move(&self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        let player = state.to_move();
        let mut best: Option<(usize, f64)> = None;

        for position in state.legal_moves() {
            let Some(value) = state
                .simulate(position, player)
                .ok()
                .and_then(|child| self.value(&child))
            else {
                continue;
            };
            let better = match best {
                None => true,
                Some((_, best_value)) if player.is_maximizer() => value > best_value,
                Some((_, best_value)) => value < best_value,
            };
            if better {
                best = Some((position, value));
            }
        }

        best.map(|(position, _)| position)
    }

    /// Result of optimal play from `state` by both sides.
    pub fn outcome(&self, state: &GameState) -> Option<GameStatus> {
        let mut current = *state;
        loop {
            let status = current.terminal_status();
            if status.is_terminal() {
                return Some(status);
            }
            let position = self.best_move(&current)?;
            current.apply(position, current.to_move()).ok()?;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameState, f64)> {
        self.values.iter().map(|(state, &value)| (state, value))
    }

    /// Copy the values into a store with a constant zero initializer.
    pub fn store(&self) -> ValueStore {
        let mut store = ValueStore::deterministic(0.0);
        for (state, value) in self.iter() {
            store.set(state, value);
        }
        store
    }

    pub fn into_store(self) -> ValueStore {
        let mut store = ValueStore::deterministic(0.0);
        for (state, value) in self.values {
            store.set(&state, value);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_sizes_match_known_counts() {
        let solution = ExactSolver::default().solve();
        assert_eq!(
            solution.layer_sizes(),
            &[1, 3, 12, 38, 108, 174, 204, 153, 57, 15]
        );
        assert_eq!(solution.len(), 765);
    }

    #[test]
    fn terminal_counts() {
        let counts = ExactSolver::default().solve().terminal_counts();
        assert_eq!(
            counts,
            TerminalCounts {
                draws: 3,
                x_wins: 91,
                o_wins: 44
            }
        );
        assert_eq!(counts.total(), 138);
    }

    #[test]
    fn empty_board_is_a_draw() {
        let solution = ExactSolver::default().solve();
        assert_eq!(solution.value(&GameState::new()), Some(0.0));
        assert_eq!(solution.outcome(&GameState::new()), Some(GameStatus::Draw));
    }

    #[test]
    fn win_in_one_is_discounted_once() {
        let solution = ExactSolver::default().solve();
        // X to move with 7 and 8 taken; 9 wins immediately.
        let state = GameState::from_label("XX./OO./...").unwrap();
        assert!((solution.value(&state).unwrap() - 0.9).abs() < 1e-12);
        assert_eq!(solution.best_move(&state), Some(9));
    }

    #[test]
    fn terminal_values_are_rewards() {
        let solution = ExactSolver::default().solve();
        let x_win = GameState::from_label("XXX/OO./...").unwrap();
        let o_win = GameState::from_label("OOO/XX./X..").unwrap();
        assert_eq!(solution.value(&x_win), Some(1.0));
        assert_eq!(solution.value(&o_win), Some(-1.0));
        assert_eq!(solution.best_move(&x_win), None);
    }

    #[test]
    fn unreachable_board_has_no_value() {
        let solution = ExactSolver::default().solve();
        let state = GameState::from_label("XXX/.../...").unwrap();
        assert_eq!(solution.value(&state), None);
    }

    #[test]
    fn store_contains_every_state() {
        let solution = ExactSolver::default().solve();
        let store = solution.store();
        assert_eq!(store.len(), 765);
        assert_eq!(store.peek(&GameState::new()), Some(0.0));
    }
}
