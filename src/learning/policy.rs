//! ε-greedy move selection over afterstate values

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    tictactoe::{GameState, Player},
    values::ValueStore,
};

/// Result of one selection step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    /// Keypad position to play
    pub position: usize,
    /// True if the move was drawn at random
    pub explored: bool,
}

/// Greedy move for `player`: simulate each legal move and keep the
/// afterstate with the highest (X) or lowest (O) value.
///
/// Unseen afterstates are initialised in `store`. Ties keep the first move
/// in ascending position order.
///
/// # Errors
///
/// Returns [`Error::NoValidMoves`] on a full board.
pub fn greedy_move(store: &mut ValueStore, state: &GameState, player: Player) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;

    for position in state.legal_moves() {
        let afterstate = state.simulate(position, player)?;
        let value = store.get(&afterstate);

        let better = match best {
            None => true,
            Some((_, best_value)) if player.is_maximizer() => value > best_value,
            Some((_, best_value)) => value < best_value,
        };
        if better {
            best = Some((position, value));
        }
    }

    best.map(|(position, _)| position).ok_or(Error::NoValidMoves)
}

/// Uniformly random legal move.
pub fn random_move<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Result<usize> {
    state
        .legal_moves()
        .choose(rng)
        .copied()
        .ok_or(Error::NoValidMoves)
}

/// With probability `epsilon` a random legal move, otherwise [`greedy_move`].
pub fn epsilon_greedy<R: Rng + ?Sized>(
    store: &mut ValueStore,
    state: &GameState,
    player: Player,
    epsilon: f64,
    rng: &mut R,
) -> Result<Choice> {
    if epsilon > 0.0 && rng.random::<f64>() < epsilon {
        return Ok(Choice {
            position: random_move(state, rng)?,
            explored: true,
        });
    }
    Ok(Choice {
        position: greedy_move(store, state, player)?,
        explored: false,
    })
}
