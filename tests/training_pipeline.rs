//! End-to-end self-play training, checkpoints and evaluation.

use std::cell::RefCell;

use tempfile::TempDir;
use tictactoe_rl::{
    agents::{GreedyAgent, MonteCarloAgent, RandomAgent, TdAgent},
    learning::LearningConfig,
    pipeline::{
        OpenerValueTracker, OpeningSchedule, OpeningTracker, TrainingConfig, TrainingSession,
        compare_values, head_to_head, playthroughs, pool_tables, rates_vs_random,
    },
    ports::Learner,
    solver::ExactSolver,
    tictactoe::{GameState, GameStatus, Player},
    values::{Averaging, ValueStore, load, save},
};

fn td_pair(seed: u64) -> (TdAgent, TdAgent) {
    let config = LearningConfig::default();
    (
        TdAgent::new(Player::X, ValueStore::learning().with_seed(seed), config),
        TdAgent::new(Player::O, ValueStore::learning().with_seed(seed + 1), config),
    )
}

#[test]
fn td_self_play_records_every_game() {
    let (mut x, mut o) = td_pair(1);
    let mut tracker = OpeningTracker::new(50).with_sampling(100);
    let config = TrainingConfig::default().with_episodes(600).with_seed(1);

    let summary = TrainingSession::new(config)
        .with_observer(Box::new(&mut tracker))
        .run(&mut x, &mut o)
        .unwrap();

    assert_eq!(summary.games, 600);
    assert_eq!(summary.x_wins + summary.o_wins + summary.draws, 600);
    assert_eq!(tracker.totals(), summary);
    assert_eq!(
        tracker.openings().collect::<Vec<_>>(),
        vec![Some(1), Some(2), Some(5)]
    );
    assert_eq!(tracker.history().len(), 6);

    for store in [x.store(), o.store()] {
        assert!(!store.is_empty());
        assert!(store.len() <= 765);
        for (state, entry) in store.iter() {
            assert_eq!(state.encode(), state.canonical_code());
            assert!(entry.value.is_finite());
        }
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let (mut x, mut o) = td_pair(3);
        let config = TrainingConfig::default().with_episodes(300).with_seed(9);
        let summary = TrainingSession::new(config).run(&mut x, &mut o).unwrap();
        (summary, x.into_store(), o.into_store())
    };

    let (first_summary, first_x, first_o) = run();
    let (second_summary, second_x, second_o) = run();
    assert_eq!(first_summary, second_summary);
    assert_eq!(first_x, second_x);
    assert_eq!(first_o, second_o);
}

#[test]
fn checkpoints_write_loadable_tables() {
    let dir = TempDir::new().unwrap();
    let (mut x, mut o) = td_pair(5);
    let config = TrainingConfig::default()
        .with_episodes(200)
        .with_seed(5)
        .with_checkpoint_every(50);
    let written = RefCell::new(Vec::new());

    TrainingSession::new(config)
        .with_checkpoint(|episodes, x: &dyn Learner, o: &dyn Learner| {
            for (side, learner) in [("x", x), ("o", o)] {
                if let Some(store) = learner.value_store() {
                    save(store, dir.path().join(format!("{side}-{episodes}.json")))?;
                }
            }
            written.borrow_mut().push(episodes);
            Ok(())
        })
        .run(&mut x, &mut o)
        .unwrap();

    assert_eq!(*written.borrow(), vec![50, 100, 150, 200]);
    let final_x = load(dir.path().join("x-200.json")).unwrap();
    let final_o = load(dir.path().join("o-200.json")).unwrap();
    assert_eq!(&final_x, x.store());
    assert_eq!(&final_o, o.store());
}

#[test]
fn monte_carlo_tables_compare_against_the_solver() {
    let config = LearningConfig::default();
    let mut x = MonteCarloAgent::new(Player::X, ValueStore::learning().with_seed(2), config)
        .with_averaging(Averaging::SampleMean);
    let mut o = MonteCarloAgent::new(Player::O, ValueStore::learning().with_seed(3), config)
        .with_averaging(Averaging::SampleMean);
    let training = TrainingConfig::default()
        .with_episodes(1_000)
        .with_seed(2)
        .with_averaging(Averaging::SampleMean);
    TrainingSession::new(training).run(&mut x, &mut o).unwrap();

    let solution = ExactSolver::default().solve();
    for store in [x.store(), o.store()] {
        let comparison = compare_values(store, &solution);
        let rmse = comparison.rmse.unwrap();
        assert!(rmse.is_finite() && rmse >= 0.0);
        assert_eq!(comparison.overlap, store.len());
        assert_eq!(comparison.overlap + comparison.unseen, 765);
        assert!(comparison.missing_terminals.total() <= 138);
    }

    let games = head_to_head(x.store(), o.store(), &solution, &[1, 5, 2]).unwrap();
    assert_eq!(games.len(), 3);
    for game in games {
        // Nobody beats optimal play.
        assert_ne!(game.learned_x, GameStatus::Win(Player::X));
        assert_ne!(game.learned_o, GameStatus::Win(Player::O));
    }
}

#[test]
fn trained_x_loses_less_than_a_random_x() {
    let (mut x, mut o) = td_pair(7);
    let config = TrainingConfig::default()
        .with_episodes(5_000)
        .with_seed(7)
        .with_openings(OpeningSchedule::None);
    TrainingSession::new(config).run(&mut x, &mut o).unwrap();

    let mut trained = GreedyAgent::new(Player::X, x.into_store());
    let trained_record = rates_vs_random(&mut trained, 500, 42).unwrap();
    let mut baseline = RandomAgent::new(Player::X).with_seed(41);
    let baseline_record = rates_vs_random(&mut baseline, 500, 42).unwrap();

    assert_eq!(trained_record.games, 500);
    assert!(
        trained_record.loss_rate() < baseline_record.loss_rate(),
        "trained {:.3} vs random {:.3}",
        trained_record.loss_rate(),
        baseline_record.loss_rate()
    );
}

#[test]
fn opener_values_follow_the_x_table() {
    let (mut x, mut o) = td_pair(11);
    let mut opener_values = OpenerValueTracker::new(100);
    let config = TrainingConfig::default().with_episodes(300).with_seed(11);

    TrainingSession::new(config)
        .with_observer(Box::new(&mut opener_values))
        .run(&mut x, &mut o)
        .unwrap();

    let games: Vec<usize> = opener_values.series().iter().map(|(game, _)| *game).collect();
    assert_eq!(games, vec![100, 200, 300]);

    let expected = [9, 6, 5].map(|position| {
        let opener = GameState::new().simulate(position, Player::X).unwrap();
        x.store().peek(&opener)
    });
    assert_eq!(opener_values.latest(), Some(expected));
    // The forced corner, side and centre openings have all been played by now.
    assert!(expected.iter().all(Option::is_some));
}

#[test]
fn learned_sides_play_through_on_the_pooled_table() {
    let (mut x, mut o) = td_pair(13);
    let config = TrainingConfig::default().with_episodes(1_000).with_seed(13);
    TrainingSession::new(config).run(&mut x, &mut o).unwrap();

    let pooled = pool_tables(x.store(), o.store());
    assert!(pooled.len() >= x.store().len().max(o.store().len()));
    assert!(pooled.len() <= x.store().len() + o.store().len());

    let games = playthroughs(x.store(), o.store(), &[1, 2, 5]).unwrap();
    assert_eq!(games.len(), 3);
    for (game, opening) in games.iter().zip([1, 2, 5]) {
        assert_eq!(game.opening, opening);
        assert_ne!(game.status, GameStatus::Running);
        assert!((5..=9).contains(&game.steps.len()));
        assert_eq!(
            game.steps[0].0,
            GameState::new().simulate(opening, Player::X).unwrap()
        );
        for (state, value) in &game.steps {
            assert_eq!(*value, pooled.peek(state));
        }
        assert_eq!(game.steps.last().unwrap().0.terminal_status(), game.status);
    }
}
