//! The exact solver against known facts about Tic-Tac-Toe.

mod common;

use common::{play, reachable_states};
use tictactoe_rl::{
    agents::GreedyAgent,
    learning::greedy_move,
    pipeline::play_match,
    solver::{ExactSolver, TerminalCounts},
    tictactoe::{GameState, GameStatus, Player},
};

#[test]
fn every_reachable_state_is_solved() {
    let solution = ExactSolver::default().solve();
    for state in reachable_states() {
        let value = solution.value(&state).unwrap_or_else(|| panic!("{}", state.label()));
        assert!((-1.0..=1.0).contains(&value));
    }
    assert_eq!(solution.len(), 765);
}

#[test]
fn layer_and_terminal_counts() {
    let solution = ExactSolver::default().solve();
    assert_eq!(
        solution.layer_sizes(),
        &[1, 3, 12, 38, 108, 174, 204, 153, 57, 15]
    );
    assert_eq!(
        solution.terminal_counts(),
        TerminalCounts {
            draws: 3,
            x_wins: 91,
            o_wins: 44,
        }
    );
}

#[test]
fn empty_board_value_is_exactly_zero() {
    // Optimal play draws, the draw reward is 0, and γ·0 = 0 at every ply.
    let solution = ExactSolver::new(0.9).solve();
    assert_eq!(solution.value(&GameState::new()), Some(0.0));

    let undiscounted = ExactSolver::new(1.0).solve();
    assert_eq!(undiscounted.value(&GameState::new()), Some(0.0));
}

#[test]
fn terminal_values_are_the_rewards() {
    let solution = ExactSolver::default().solve();
    for state in reachable_states() {
        if let Some(reward) = state.terminal_status().reward() {
            assert_eq!(solution.value(&state), Some(reward), "{}", state.label());
        }
    }
}

#[test]
fn values_are_consistent_with_children() {
    let solution = ExactSolver::default().solve();
    for state in reachable_states().into_iter().filter(|s| !s.is_terminal()) {
        let player = state.to_move();
        let children = state
            .legal_moves()
            .into_iter()
            .map(|p| solution.value(&state.simulate(p, player).unwrap()).unwrap());
        let best = if player == Player::X {
            children.fold(f64::NEG_INFINITY, f64::max)
        } else {
            children.fold(f64::INFINITY, f64::min)
        };
        let value = solution.value(&state).unwrap();
        assert!((value - 0.9 * best).abs() < 1e-12, "{}", state.label());
    }
}

#[test]
fn o_answers_the_centre_with_a_corner() {
    let solution = ExactSolver::default().solve();
    let mut store = solution.store();
    let after_centre = play(&[5]);

    let reply = greedy_move(&mut store, &after_centre, Player::O).unwrap();
    assert_eq!(reply, 1);
    let value = solution.value(&after_centre.simulate(1, Player::O).unwrap());
    assert_eq!(value, Some(0.0));

    // A side reply loses.
    let side = solution.value(&after_centre.simulate(2, Player::O).unwrap()).unwrap();
    assert!(side > 0.0);
}

#[test]
fn centre_then_corner_is_a_draw() {
    let solution = ExactSolver::default().solve();
    assert_eq!(solution.outcome(&play(&[5, 1])), Some(GameStatus::Draw));
}

#[test]
fn optimal_play_draws_from_every_opening() {
    let solution = ExactSolver::default().solve();
    let mut x = GreedyAgent::new(Player::X, solution.store());
    let mut o = GreedyAgent::new(Player::O, solution.store());

    for opening in 1..=9 {
        let record = play_match(&mut x, &mut o, Some(opening)).unwrap();
        assert_eq!(record.status, GameStatus::Draw, "opening {opening}");
        assert_eq!(record.trajectory.len(), 9);
        assert_eq!(solution.outcome(&play(&[opening])), Some(GameStatus::Draw));
    }
}

#[test]
fn best_move_takes_an_immediate_win() {
    let solution = ExactSolver::default().solve();
    // O to move: O holds 4 and 5, X holds 7 and 8 and threatens 9.
    let state = play(&[7, 4, 8, 5, 1]);
    assert_eq!(state.to_move(), Player::O);
    assert_eq!(solution.best_move(&state), Some(6));
}
