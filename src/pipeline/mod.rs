//! Match, training and evaluation pipeline
//!
//! This module provides:
//! - The match driver that alternates two learners
//! - Self-play training sessions with forced-opening schedules
//! - Observers recording progress and rolling outcome rates
//! - Comparison of learned tables against the exact solution

pub mod comparison;
pub mod driver;
pub mod observers;
pub mod training;

pub use comparison::{
    AgentRecord, DEFAULT_OPENINGS, HeadToHead, Playthrough, ValueComparison, compare_values,
    head_to_head, playthroughs, pool_tables, rates_vs_random,
};
pub use driver::{MatchRecord, play_match};
pub use observers::{
    LoggingObserver, OPENER_POSITIONS, OpenerValueTracker, OpeningTracker, OutcomeRates,
    ProgressObserver,
};
pub use training::{
    CheckpointFn, OpeningSchedule, TrainingConfig, TrainingSession, TrainingSummary,
};

pub use crate::ports::{Learner, Observer};
