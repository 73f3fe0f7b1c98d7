//! Observers for training sessions
//!
//! Observers collect data during training without coupling the training
//! loop to an output format.

use std::collections::{BTreeMap, VecDeque};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::{Deserialize, Serialize};

use super::training::TrainingSummary;
use crate::{
    Result,
    ports::{Learner, Observer},
    tictactoe::{GameState, GameStatus, Player},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    summary: TrainingSummary,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            summary: TrainingSummary::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "X:{} O:{} D:{}",
            self.summary.x_wins, self.summary.o_wins, self.summary.draws
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(
        &mut self,
        game_num: usize,
        status: GameStatus,
        _opening: Option<usize>,
    ) -> Result<()> {
        self.summary.record(status);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Fractions of X wins, O wins and draws
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRates {
    pub x_win: f64,
    pub o_win: f64,
    pub draw: f64,
}

impl OutcomeRates {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a GameStatus>) -> Self {
        let mut summary = TrainingSummary::default();
        for &status in outcomes {
            summary.record(status);
        }
        Self::from(summary)
    }
}

impl From<TrainingSummary> for OutcomeRates {
    fn from(summary: TrainingSummary) -> Self {
        Self {
            x_win: summary.x_win_rate(),
            o_win: summary.o_win_rate(),
            draw: summary.draw_rate(),
        }
    }
}

/// Default rolling window length
pub const DEFAULT_WINDOW: usize = 100;

/// Rolling outcome rates per forced opening
///
/// Keeps the last `window` results for each opening (games without a forced
/// opening are grouped under `None`) plus running totals, so learning
/// curves can be drawn per opening and pooled.
#[derive(Debug, Clone)]
pub struct OpeningTracker {
    window: usize,
    recent: BTreeMap<Option<usize>, VecDeque<GameStatus>>,
    totals: TrainingSummary,
    history: Vec<(usize, OutcomeRates)>,
    sample_every: Option<usize>,
}

impl OpeningTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            recent: BTreeMap::new(),
            totals: TrainingSummary::default(),
            history: Vec::new(),
            sample_every: None,
        }
    }

    /// Record the pooled rolling rates every `every` games.
    pub fn with_sampling(mut self, every: usize) -> Self {
        self.sample_every = Some(every.max(1));
        self
    }

    pub fn record(&mut self, opening: Option<usize>, status: GameStatus) {
        let window = self.window;
        let recent = self.recent.entry(opening).or_default();
        if recent.len() == window {
            recent.pop_front();
        }
        recent.push_back(status);
        self.totals.record(status);
    }

    pub fn totals(&self) -> TrainingSummary {
        self.totals
    }

    /// Openings seen so far, in ascending order.
    pub fn openings(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.recent.keys().copied()
    }

    /// Rates over the last `window` games with this opening.
    pub fn rolling_rates(&self, opening: Option<usize>) -> Option<OutcomeRates> {
        self.recent
            .get(&opening)
            .filter(|recent| !recent.is_empty())
            .map(|recent| OutcomeRates::from_outcomes(recent))
    }

    /// Rates over every opening's window combined.
    pub fn pooled_rates(&self) -> OutcomeRates {
        OutcomeRates::from_outcomes(self.recent.values().flatten())
    }

    /// Sampled `(game_num, pooled rates)` points.
    pub fn history(&self) -> &[(usize, OutcomeRates)] {
        &self.history
    }
}

impl Default for OpeningTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Observer for OpeningTracker {
    fn on_game_end(
        &mut self,
        game_num: usize,
        status: GameStatus,
        opening: Option<usize>,
    ) -> Result<()> {
        self.record(opening, status);
        if let Some(every) = self.sample_every {
            if game_num.is_multiple_of(every) {
                let rates = self.pooled_rates();
                self.history.push((game_num, rates));
            }
        }
        Ok(())
    }
}

/// X's opening moves tracked by [`OpenerValueTracker`]: corner, side, centre
pub const OPENER_POSITIONS: [usize; 3] = [9, 6, 5];

/// Learned value of X's corner, side and centre openings over training
///
/// Every `every` games the afterstates of [`OPENER_POSITIONS`] are read
/// from X's table without initialising them, so an opening X has not
/// tried yet shows up as `None`.
#[derive(Debug, Clone)]
pub struct OpenerValueTracker {
    every: usize,
    openers: [GameState; 3],
    series: Vec<(usize, [Option<f64>; 3])>,
}

impl OpenerValueTracker {
    pub fn new(every: usize) -> Self {
        let openers = OPENER_POSITIONS.map(|position| {
            GameState::new()
                .simulate(position, Player::X)
                .unwrap_or_default()
        });
        Self {
            every: every.max(1),
            openers,
            series: Vec::new(),
        }
    }

    /// Opening afterstates in corner, side, centre order.
    pub fn openers(&self) -> &[GameState; 3] {
        &self.openers
    }

    /// Sampled `(game_num, [corner, side, centre])` values.
    pub fn series(&self) -> &[(usize, [Option<f64>; 3])] {
        &self.series
    }

    pub fn latest(&self) -> Option<[Option<f64>; 3]> {
        self.series.last().map(|&(_, values)| values)
    }
}

impl Default for OpenerValueTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Observer for OpenerValueTracker {
    fn on_learners_updated(
        &mut self,
        game_num: usize,
        x: &dyn Learner,
        _o: &dyn Learner,
    ) -> Result<()> {
        if game_num.is_multiple_of(self.every) {
            let values = match x.value_store() {
                Some(store) => self.openers.each_ref().map(|opener| store.peek(opener)),
                None => [None; 3],
            };
            self.series.push((game_num, values));
        }
        Ok(())
    }
}

/// Logs rolling rates through `log` every `every` games
pub struct LoggingObserver {
    every: usize,
    recent: VecDeque<GameStatus>,
}

impl LoggingObserver {
    pub fn new(every: usize) -> Self {
        let every = every.max(1);
        Self {
            every,
            recent: VecDeque::with_capacity(every),
        }
    }
}

impl Observer for LoggingObserver {
    fn on_game_end(
        &mut self,
        game_num: usize,
        status: GameStatus,
        _opening: Option<usize>,
    ) -> Result<()> {
        if self.recent.len() == self.every {
            self.recent.pop_front();
        }
        self.recent.push_back(status);

        if game_num.is_multiple_of(self.every) {
            let rates = OutcomeRates::from_outcomes(&self.recent);
            info!(
                "game {game_num}: last {} games X {:.1}% / O {:.1}% / draw {:.1}%",
                self.recent.len(),
                rates.x_win * 100.0,
                rates.o_win * 100.0,
                rates.draw * 100.0
            );
        }
        Ok(())
    }
}
