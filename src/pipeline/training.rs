//! Self-play training between an X learner and an O learner

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::driver::{MatchRecord, play_match};
use crate::{
    Error, Result,
    learning::LearningConfig,
    ports::{Learner, Observer},
    tictactoe::{GameStatus, Player},
    values::Averaging,
};

/// Forced first moves for X, one per episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpeningSchedule {
    /// X's learner picks its own first move
    None,
    /// Episode `i` opens with `positions[i % len]`
    Cycle(Vec<usize>),
}

impl OpeningSchedule {
    /// Corner, side and centre: one opening per canonical class.
    pub fn canonical() -> Self {
        OpeningSchedule::Cycle(vec![1, 2, 5])
    }

    /// Forced opening for the zero-based `episode`.
    pub fn opening_for(&self, episode: usize) -> Option<usize> {
        match self {
            OpeningSchedule::None => None,
            OpeningSchedule::Cycle(positions) if positions.is_empty() => None,
            OpeningSchedule::Cycle(positions) => Some(positions[episode % positions.len()]),
        }
    }
}

impl Default for OpeningSchedule {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of self-play games
    pub episodes: usize,

    /// Seed for both learners' move RNGs (O gets `seed + 1`)
    pub seed: Option<u64>,

    /// α, γ, ε shared by both learners
    pub learning: LearningConfig,

    /// Monte Carlo averaging override. `None` keeps a resumed table's own
    /// policy and gives new tables [`Averaging::Exponential`].
    pub averaging: Option<Averaging>,

    pub openings: OpeningSchedule,

    /// Run the checkpoint callback every this many episodes
    pub checkpoint_every: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            seed: None,
            learning: LearningConfig::default(),
            averaging: None,
            openings: OpeningSchedule::default(),
            checkpoint_every: None,
        }
    }
}

impl TrainingConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_learning(mut self, learning: LearningConfig) -> Self {
        self.learning = learning;
        self
    }

    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = Some(averaging);
        self
    }

    pub fn with_openings(mut self, openings: OpeningSchedule) -> Self {
        self.openings = openings;
        self
    }

    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = Some(every);
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for bad hyperparameters, an
    /// opening outside 1..=9, an empty opening cycle, or a zero checkpoint
    /// interval.
    pub fn validate(&self) -> Result<()> {
        self.learning.validate()?;
        if let OpeningSchedule::Cycle(positions) = &self.openings {
            if positions.is_empty() {
                return Err(Error::InvalidConfiguration {
                    message: "opening cycle must name at least one position".to_string(),
                });
            }
            if let Some(bad) = positions.iter().find(|p| !(1..=9).contains(*p)) {
                return Err(Error::InvalidConfiguration {
                    message: format!("opening {bad} is not a position 1-9"),
                });
            }
        }
        if self.checkpoint_every == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "checkpoint interval must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open training config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}

/// Outcome counts of a training run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

impl TrainingSummary {
    pub fn record(&mut self, status: GameStatus) {
        match status {
            GameStatus::Win(Player::X) => self.x_wins += 1,
            GameStatus::Win(Player::O) => self.o_wins += 1,
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

    pub fn x_win_rate(&self) -> f64 {
        self.rate(self.x_wins)
    }

    pub fn o_win_rate(&self) -> f64 {
        self.rate(self.o_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }
}

/// Periodic persistence hook: `(episodes_done, x, o)`
pub type CheckpointFn<'a> = Box<dyn FnMut(usize, &dyn Learner, &dyn Learner) -> Result<()> + 'a>;

/// Training session for an X and an O learner
pub struct TrainingSession<'a> {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer + 'a>>,
    checkpoint: Option<CheckpointFn<'a>>,
}

impl<'a> TrainingSession<'a> {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            checkpoint: None,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Add an observer. Pass `&mut observer` to read it back after the run.
    pub fn with_observer(mut self, observer: Box<dyn Observer + 'a>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Called every `checkpoint_every` episodes and never otherwise.
    pub fn with_checkpoint<F>(mut self, checkpoint: F) -> Self
    where
        F: FnMut(usize, &dyn Learner, &dyn Learner) -> Result<()> + 'a,
    {
        self.checkpoint = Some(Box::new(checkpoint));
        self
    }

    /// Play `episodes` games, updating both learners after each one.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, on a learner or observer error,
    /// or when the checkpoint callback fails.
    pub fn run(&mut self, x: &mut dyn Learner, o: &mut dyn Learner) -> Result<TrainingSummary> {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            x.set_rng_seed(seed)?;
            o.set_rng_seed(seed.wrapping_add(1))?;
        }

        info!(
            "training {} vs {} for {} episodes",
            x.name(),
            o.name(),
            self.config.episodes
        );
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut summary = TrainingSummary::default();
        for episode in 0..self.config.episodes {
            let opening = self.config.openings.opening_for(episode);
            let record = play_match(x, o, opening)?;
            Self::update(&record, x, o)?;
            summary.record(record.status);
            debug!(
                "episode {}: {} after {} plies",
                episode + 1,
                record.status,
                record.trajectory.len()
            );

            for observer in &mut self.observers {
                observer.on_game_end(episode + 1, record.status, opening)?;
                observer.on_learners_updated(episode + 1, &*x, &*o)?;
            }

            if let (Some(every), Some(checkpoint)) =
                (self.config.checkpoint_every, self.checkpoint.as_mut())
            {
                if (episode + 1).is_multiple_of(every) {
                    debug!("checkpoint after {} episodes", episode + 1);
                    checkpoint(episode + 1, &*x, &*o)?;
                }
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }
        info!(
            "training done: {} games, X {} / O {} / draw {}",
            summary.games, summary.x_wins, summary.o_wins, summary.draws
        );
        Ok(summary)
    }

    fn update(record: &MatchRecord, x: &mut dyn Learner, o: &mut dyn Learner) -> Result<()> {
        let reward = record.reward();
        x.learn(&record.afterstates(Player::X), reward)?;
        o.learn(&record.afterstates(Player::O), reward)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        agents::{RandomAgent, TdAgent},
        values::ValueStore,
    };

    #[test]
    fn cycle_wraps() {
        let schedule = OpeningSchedule::canonical();
        let openings: Vec<_> = (0..5).map(|i| schedule.opening_for(i)).collect();
        assert_eq!(openings, vec![Some(1), Some(2), Some(5), Some(1), Some(2)]);
        assert_eq!(OpeningSchedule::None.opening_for(3), None);
    }

    #[test]
    fn validate_rejects_bad_openings() {
        let config = TrainingConfig::default().with_openings(OpeningSchedule::Cycle(vec![0]));
        assert!(config.validate().is_err());
        let config = TrainingConfig::default().with_openings(OpeningSchedule::Cycle(vec![]));
        assert!(config.validate().is_err());
        assert!(TrainingConfig::default().with_checkpoint_every(0).validate().is_err());
    }

    #[test]
    fn summary_counts_every_game() {
        let mut x = RandomAgent::new(Player::X);
        let mut o = RandomAgent::new(Player::O);
        let mut session = TrainingSession::new(TrainingConfig::default().with_episodes(25).with_seed(7));
        let summary = session.run(&mut x, &mut o).unwrap();

        assert_eq!(summary.games, 25);
        assert_eq!(summary.x_wins + summary.o_wins + summary.draws, 25);
        let total = summary.x_win_rate() + summary.o_win_rate() + summary.draw_rate();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn checkpoint_runs_on_schedule() {
        let calls = RefCell::new(Vec::new());
        let mut x = TdAgent::new(Player::X, ValueStore::learning(), LearningConfig::default());
        let mut o = TdAgent::new(Player::O, ValueStore::learning(), LearningConfig::default());
        let mut session = TrainingSession::new(
            TrainingConfig::default()
                .with_episodes(10)
                .with_seed(1)
                .with_checkpoint_every(4),
        )
        .with_checkpoint(|done, x, _| {
            assert!(x.value_store().is_some());
            calls.borrow_mut().push(done);
            Ok(())
        });
        session.run(&mut x, &mut o).unwrap();
        drop(session);

        assert_eq!(calls.into_inner(), vec![4, 8]);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = || {
            let mut x = TdAgent::new(
                Player::X,
                ValueStore::learning().with_seed(11),
                LearningConfig::default(),
            );
            let mut o = TdAgent::new(
                Player::O,
                ValueStore::learning().with_seed(12),
                LearningConfig::default(),
            );
            TrainingSession::new(TrainingConfig::default().with_episodes(50).with_seed(3))
                .run(&mut x, &mut o)
                .unwrap()
        };
        assert_eq!(run(), run());
    }
}
