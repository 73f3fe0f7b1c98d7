//! Value table keyed by canonical board state

use std::{
    collections::{HashMap, hash_map},
    fmt,
    str::FromStr,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::tictactoe::GameState;

/// How an unseen state's value is created on first lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Initializer {
    /// Uniform sample from `[low, high]`
    Uniform { low: f64, high: f64 },
    /// Fixed value
    Constant(f64),
}

impl Initializer {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        match *self {
            Initializer::Constant(value) => value,
            Initializer::Uniform { low, high } if high > low => rng.random_range(low..=high),
            Initializer::Uniform { low, .. } => low,
        }
    }
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::Uniform {
            low: -1.0,
            high: 1.0,
        }
    }
}

/// Monte Carlo averaging policy of a store.
///
/// The two policies converge differently: `Exponential` tracks recent
/// returns with a fixed step size α, `SampleMean` weights every return
/// equally using the per-state visit counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Averaging {
    /// `v ← v + α(G − v)`
    #[default]
    Exponential,
    /// `v ← (v·n + G)/(n + 1)`, `n ← n + 1`
    SampleMean,
}

impl fmt::Display for Averaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Averaging::Exponential => "exponential",
            Averaging::SampleMean => "sample-mean",
        };
        f.write_str(label)
    }
}

impl FromStr for Averaging {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" | "exp" => Ok(Averaging::Exponential),
            "sample-mean" | "sample_mean" | "mean" => Ok(Averaging::SampleMean),
            _ => Err(crate::Error::ParseAveraging {
                input: s.to_string(),
                expected: "exponential, sample-mean".to_string(),
            }),
        }
    }
}

/// Stored estimate for one canonical state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub value: f64,
    /// Number of sample-mean updates folded into `value`
    pub visits: u64,
}

impl Entry {
    pub fn new(value: f64) -> Self {
        Entry { value, visits: 0 }
    }
}

/// Seeded RNG, or one seeded from the thread RNG when `seed` is `None`.
pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// State-value function over canonical Tic-Tac-Toe positions.
///
/// Every lookup through [`ValueStore::get`] creates the entry when it is
/// missing, so callers never see a missing value. Use [`ValueStore::peek`]
/// for read-only analysis.
#[derive(Debug, Clone)]
pub struct ValueStore {
    entries: HashMap<GameState, Entry>,
    initializer: Initializer,
    averaging: Averaging,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl ValueStore {
    /// Create an empty store with the given initializer
    pub fn new(initializer: Initializer) -> Self {
        Self {
            entries: HashMap::new(),
            initializer,
            averaging: Averaging::default(),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Store for learning agents: unseen states start uniform in [-1, 1].
    pub fn learning() -> Self {
        Self::new(Initializer::default())
    }

    /// Store whose unseen states start at a fixed value.
    pub fn deterministic(default: f64) -> Self {
        Self::new(Initializer::Constant(default))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }

    pub fn initializer(&self) -> Initializer {
        self.initializer
    }

    pub fn averaging(&self) -> Averaging {
        self.averaging
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Entry for `state`, created through the initializer if absent.
    pub fn entry_mut(&mut self, state: &GameState) -> &mut Entry {
        let Self {
            entries,
            initializer,
            rng,
            ..
        } = self;
        entries
            .entry(state.canonical_form())
            .or_insert_with(|| Entry::new(initializer.sample(rng)))
    }

    /// Value of `state`, initialising it on first visit.
    pub fn get(&mut self, state: &GameState) -> f64 {
        self.entry_mut(state).value
    }

    /// Value of `state` without initialising it.
    pub fn peek(&self, state: &GameState) -> Option<f64> {
        self.entries.get(state).map(|entry| entry.value)
    }

    pub fn entry(&self, state: &GameState) -> Option<&Entry> {
        self.entries.get(state)
    }

    pub fn contains(&self, state: &GameState) -> bool {
        self.entries.contains_key(state)
    }

    /// Replace the value of `state`, keeping its visit count.
    pub fn set(&mut self, state: &GameState, value: f64) {
        match self.entries.get_mut(state) {
            Some(entry) => entry.value = value,
            None => {
                self.entries
                    .insert(state.canonical_form(), Entry::new(value));
            }
        }
    }

    /// Replace the whole entry of `state`.
    pub fn insert_entry(&mut self, state: &GameState, entry: Entry) {
        self.entries.remove(state);
        self.entries.insert(state.canonical_form(), entry);
    }

    /// Transform the value of `state` (initialising it first) and return the new value.
    pub fn update(&mut self, state: &GameState, f: impl FnOnce(f64) -> f64) -> f64 {
        let entry = self.entry_mut(state);
        entry.value = f(entry.value);
        entry.value
    }

    /// Number of distinct canonical states seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sample-mean updates recorded across all entries.
    pub fn total_visits(&self) -> u64 {
        self.entries.values().map(|entry| entry.visits).sum()
    }

    /// Canonical states and their entries, in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, GameState, Entry> {
        self.entries.iter()
    }

    /// Union with `other`; `resolve(state, ours, theirs)` decides collisions.
    pub fn merge_with<F>(&mut self, other: &ValueStore, mut resolve: F)
    where
        F: FnMut(&GameState, Entry, Entry) -> Entry,
    {
        for (state, &theirs) in other.iter() {
            match self.entries.get_mut(state) {
                Some(ours) => *ours = resolve(state, *ours, theirs),
                None => {
                    self.entries.insert(*state, theirs);
                }
            }
        }
    }

    /// Union with `other`, taking `other`'s entry on collisions.
    pub fn union(&mut self, other: &ValueStore) {
        self.merge_with(other, |_, _, theirs| theirs);
    }
}

impl Default for ValueStore {
    fn default() -> Self {
        Self::learning()
    }
}

impl PartialEq for ValueStore {
    /// Same canonical states with the same entries; configuration is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
