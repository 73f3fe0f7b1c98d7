//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use tictactoe_rl::tictactoe::{Cell, GameState, Player};

/// Play keypad moves in strict alternation starting with X.
pub fn play(moves: &[usize]) -> GameState {
    let mut state = GameState::new();
    for &position in moves {
        let player = state.to_move();
        state
            .apply(position, player)
            .expect("scripted move should be legal");
    }
    state
}

/// Every board reachable from the empty board under legal play, as raw grids.
pub fn reachable_states() -> Vec<GameState> {
    let mut seen = HashSet::new();
    let mut stack = vec![GameState::new()];
    let mut states = Vec::new();

    while let Some(state) = stack.pop() {
        if !seen.insert(state.encode()) {
            continue;
        }
        states.push(state);
        if state.is_terminal() {
            continue;
        }
        let player = state.to_move();
        for position in state.legal_moves() {
            stack.push(state.simulate(position, player).expect("legal move"));
        }
    }

    states
}

/// All 3^9 grids, legal or not.
pub fn all_grids() -> impl Iterator<Item = GameState> {
    (0..3u32.pow(9)).map(|mut code| {
        let mut cells = [Cell::Empty; 9];
        for slot in (0..9).rev() {
            cells[slot] = match code % 3 {
                0 => Cell::Empty,
                1 => Cell::X,
                _ => Cell::O,
            };
            code /= 3;
        }
        GameState::from_cells(cells)
    })
}

/// Afterstates of `player` along a scripted game.
pub fn afterstates(moves: &[usize], player: Player) -> Vec<GameState> {
    let mut state = GameState::new();
    let mut result = Vec::new();
    for &position in moves {
        let mover = state.to_move();
        state.apply(position, mover).expect("scripted move should be legal");
        if mover == player {
            result.push(state);
        }
    }
    result
}
