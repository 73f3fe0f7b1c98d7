//! Comparison of learned tables and agents against the exact solution

use log::debug;
use serde::{Deserialize, Serialize};

use super::driver::play_match;
use crate::{
    Result,
    agents::{GreedyAgent, RandomAgent},
    ports::Learner,
    solver::{Solution, TerminalCounts},
    tictactoe::{GameState, GameStatus, Player},
    values::ValueStore,
};

/// Openings used for head-to-head play: corner, centre, side
pub const DEFAULT_OPENINGS: [usize; 3] = [1, 5, 2];

/// How far a learned table is from the exact values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueComparison {
    /// Root mean squared error over states present in both tables
    pub rmse: Option<f64>,
    /// Learned states that the solver also knows
    pub overlap: usize,
    /// Solver states the learned table never visited
    pub unseen: usize,
    /// Terminal states absent from the learned table
    pub missing_terminals: TerminalCounts,
}

/// Compare a learned table to the solver's values.
pub fn compare_values(learned: &ValueStore, optimal: &Solution) -> ValueComparison {
    let mut squared_error = 0.0;
    let mut overlap = 0;
    let mut unseen = 0;
    let mut missing_terminals = TerminalCounts::default();

    for (state, exact) in optimal.iter() {
        let Some(value) = learned.peek(state) else {
            unseen += 1;
            match state.terminal_status() {
                GameStatus::Running => {}
                GameStatus::Draw => missing_terminals.draws += 1,
                GameStatus::Win(Player::X) => missing_terminals.x_wins += 1,
                GameStatus::Win(Player::O) => missing_terminals.o_wins += 1,
            }
            continue;
        };
        squared_error += (value - exact).powi(2);
        overlap += 1;
    }

    let rmse = (overlap > 0).then(|| (squared_error / overlap as f64).sqrt());
    debug!("compared {overlap} shared states, {unseen} unseen");

    ValueComparison {
        rmse,
        overlap,
        unseen,
        missing_terminals,
    }
}

/// Results of the learned tables against optimal play for one opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub opening: usize,
    /// Learned X against optimal O
    pub learned_x: GameStatus,
    /// Optimal X against learned O
    pub learned_o: GameStatus,
}

/// Play the greedy learned tables against the solver from each opening.
///
/// Both sides play greedily, so every game is deterministic. The tables are
/// cloned; unseen states initialised during play do not leak back.
pub fn head_to_head(
    learned_x: &ValueStore,
    learned_o: &ValueStore,
    optimal: &Solution,
    openings: &[usize],
) -> Result<Vec<HeadToHead>> {
    let optimal_store = optimal.store();
    let mut learned_x = GreedyAgent::new(Player::X, learned_x.clone()).with_name("learned-X");
    let mut learned_o = GreedyAgent::new(Player::O, learned_o.clone()).with_name("learned-O");
    let mut optimal_x = GreedyAgent::new(Player::X, optimal_store.clone()).with_name("optimal-X");
    let mut optimal_o = GreedyAgent::new(Player::O, optimal_store).with_name("optimal-O");

    openings
        .iter()
        .map(|&opening| -> Result<HeadToHead> {
            let x_side = play_match(&mut learned_x, &mut optimal_o, Some(opening))?;
            let o_side = play_match(&mut optimal_x, &mut learned_o, Some(opening))?;
            Ok(HeadToHead {
                opening,
                learned_x: x_side.status,
                learned_o: o_side.status,
            })
        })
        .collect()
}

/// X's and O's tables pooled into one, O's entry winning on collisions.
pub fn pool_tables(learned_x: &ValueStore, learned_o: &ValueStore) -> ValueStore {
    let mut pooled = learned_x.clone();
    pooled.union(learned_o);
    pooled
}

/// Greedy game between the two learned sides from one opening
#[derive(Debug, Clone, PartialEq)]
pub struct Playthrough {
    pub opening: usize,
    pub status: GameStatus,
    /// Board after each ply with its pooled value, `None` when never visited
    pub steps: Vec<(GameState, Option<f64>)>,
}

/// Play learned X against learned O on the pooled table from each opening.
///
/// Values are read from the pooled table as it was before play, so boards
/// first seen during these games report `None`.
pub fn playthroughs(
    learned_x: &ValueStore,
    learned_o: &ValueStore,
    openings: &[usize],
) -> Result<Vec<Playthrough>> {
    let pooled = pool_tables(learned_x, learned_o);
    let mut x = GreedyAgent::new(Player::X, pooled.clone()).with_name("learned-X");
    let mut o = GreedyAgent::new(Player::O, pooled.clone()).with_name("learned-O");
    debug!(
        "pooled {} X and {} O states into {}",
        learned_x.len(),
        learned_o.len(),
        pooled.len()
    );

    openings
        .iter()
        .map(|&opening| -> Result<Playthrough> {
            let record = play_match(&mut x, &mut o, Some(opening))?;
            let steps = record
                .trajectory
                .into_iter()
                .map(|state| (state, pooled.peek(&state)))
                .collect();
            Ok(Playthrough {
                opening,
                status: record.status,
                steps,
            })
        })
        .collect()
}

/// Win, draw and loss counts from one agent's point of view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl AgentRecord {
    fn record(&mut self, status: GameStatus, side: Player) {
        match status {
            GameStatus::Win(winner) if winner == side => self.wins += 1,
            GameStatus::Win(_) => self.losses += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::Running => return,
        }
        self.games += 1;
    }

    fn rate(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }
}

/// Play `agent` against a uniformly random opponent on the other side.
///
/// The agent is used as given: pass a frozen or ε = 0 agent to measure its
/// greedy policy.
pub fn rates_vs_random(agent: &mut dyn Learner, games: usize, seed: u64) -> Result<AgentRecord> {
    let side = agent.player();
    let mut opponent = RandomAgent::new(side.opponent()).with_seed(seed);
    let mut record = AgentRecord::default();

    for _ in 0..games {
        let result = match side {
            Player::X => play_match(agent, &mut opponent, None)?,
            Player::O => play_match(&mut opponent, agent, None)?,
        };
        record.record(result.status, side);
    }

    debug!(
        "{} vs random: {} wins, {} draws, {} losses",
        agent.name(),
        record.wins,
        record.draws,
        record.losses
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ExactSolver;

    #[test]
    fn solver_table_matches_itself() {
        let solution = ExactSolver::default().solve();
        let comparison = compare_values(&solution.store(), &solution);
        assert_eq!(comparison.rmse, Some(0.0));
        assert_eq!(comparison.overlap, 765);
        assert_eq!(comparison.unseen, 0);
        assert_eq!(comparison.missing_terminals.total(), 0);
    }

    #[test]
    fn empty_table_misses_every_terminal() {
        let solution = ExactSolver::default().solve();
        let comparison = compare_values(&ValueStore::learning(), &solution);
        assert_eq!(comparison.rmse, None);
        assert_eq!(comparison.unseen, 765);
        assert_eq!(comparison.missing_terminals, solution.terminal_counts());
    }

    #[test]
    fn optimal_tables_draw_head_to_head() {
        let solution = ExactSolver::default().solve();
        let store = solution.store();
        let results = head_to_head(&store, &store, &solution, &DEFAULT_OPENINGS).unwrap();

        assert_eq!(results.len(), 3);
        for result in results {
            assert_eq!(result.learned_x, GameStatus::Draw);
            assert_eq!(result.learned_o, GameStatus::Draw);
        }
    }

    #[test]
    fn optimal_agent_never_loses_to_random() {
        let solution = ExactSolver::default().solve();
        for side in [Player::X, Player::O] {
            let mut agent = GreedyAgent::new(side, solution.store());
            let record = rates_vs_random(&mut agent, 200, 17).unwrap();
            assert_eq!(record.games, 200);
            assert_eq!(record.losses, 0);
        }
    }

    #[test]
    fn pooled_table_prefers_o_on_collisions() {
        let empty = GameState::new();
        let centre = empty.simulate(5, Player::X).unwrap();
        let corner = empty.simulate(1, Player::X).unwrap();
        let mut x = ValueStore::deterministic(0.0);
        x.set(&centre, 0.5);
        x.set(&corner, 0.1);
        let mut o = ValueStore::deterministic(0.0);
        o.set(&centre, -0.5);

        let pooled = pool_tables(&x, &o);
        assert_eq!(pooled.len(), 2);
        assert_eq!(pooled.peek(&centre), Some(-0.5));
        assert_eq!(pooled.peek(&corner), Some(0.1));
    }

    #[test]
    fn optimal_tables_play_through_to_draws() {
        let solution = ExactSolver::default().solve();
        let store = solution.store();
        let games = playthroughs(&store, &store, &[1, 2, 5]).unwrap();

        assert_eq!(games.len(), 3);
        for game in games {
            assert_eq!(game.status, GameStatus::Draw);
            assert_eq!(game.steps.len(), 9);
            for (state, value) in &game.steps {
                assert_eq!(*value, solution.value(state));
            }
        }
    }
}
