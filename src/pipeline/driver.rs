//! Match driver: alternate two learners until the board is decided

use log::trace;

use crate::{
    Error, Result,
    ports::Learner,
    tictactoe::{GameState, GameStatus, Player},
};

/// One finished game
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Final classification, never [`GameStatus::Running`]
    pub status: GameStatus,
    /// Board after every ply, X's first move at index 0
    pub trajectory: Vec<GameState>,
    /// Positions played, aligned with `trajectory`
    pub moves: Vec<usize>,
}

impl MatchRecord {
    /// Boards right after each of `player`'s moves.
    pub fn afterstates(&self, player: Player) -> Vec<GameState> {
        let offset = match player {
            Player::X => 0,
            Player::O => 1,
        };
        self.trajectory
            .iter()
            .skip(offset)
            .step_by(2)
            .copied()
            .collect()
    }

    /// Terminal reward from X's point of view.
    pub fn reward(&self) -> f64 {
        self.status.reward().unwrap_or(0.0)
    }

    pub fn opening(&self) -> Option<usize> {
        self.moves.first().copied()
    }
}

/// Play one game, X first.
///
/// When `opening` is given it is played for X without consulting the X
/// learner. Neither learner is updated here.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if the learners are not X and O
/// respectively, and the board's move error if a learner or the opening
/// picks an illegal move.
pub fn play_match(
    x: &mut dyn Learner,
    o: &mut dyn Learner,
    opening: Option<usize>,
) -> Result<MatchRecord> {
    if x.player() != Player::X || o.player() != Player::O {
        return Err(Error::InvalidConfiguration {
            message: format!(
                "match needs an X and an O learner, got {} ({}) and {} ({})",
                x.name(),
                x.player(),
                o.name(),
                o.player()
            ),
        });
    }

    let mut state = GameState::new();
    let mut trajectory = Vec::with_capacity(9);
    let mut moves = Vec::with_capacity(9);
    let mut status = GameStatus::Running;
    let mut to_move = Player::X;

    while status == GameStatus::Running {
        let position = match (opening, moves.is_empty()) {
            (Some(position), true) => position,
            _ if to_move == Player::X => x.select_move(&state)?,
            _ => o.select_move(&state)?,
        };
        status = state.apply(position, to_move)?;
        trace!("{to_move} plays {position}: {}", state.label());

        trajectory.push(state);
        moves.push(position);
        to_move = to_move.opponent();
    }

    Ok(MatchRecord {
        status,
        trajectory,
        moves,
    })
}
