//! Train command - self-play training of an X and an O table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::warn;

use crate::{
    agents::{AgentKind, build_agent},
    cli::output::{print_kv, print_rates, print_section, print_subsection, print_summary},
    pipeline::{
        Learner, LoggingObserver, OPENER_POSITIONS, OpenerValueTracker, OpeningSchedule,
        OpeningTracker, ProgressObserver, TrainingConfig, TrainingSession,
    },
    tictactoe::Player,
    values::{self, Averaging, ValueStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// TD(0) bootstrapping
    Td,
    /// Monte Carlo returns
    Mc,
}

impl From<Algorithm> for AgentKind {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Td => AgentKind::TemporalDifference,
            Algorithm::Mc => AgentKind::MonteCarlo,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train X and O value tables by self-play")]
pub struct TrainArgs {
    /// Update rule
    #[arg(long, value_enum, default_value = "td")]
    pub algorithm: Algorithm,

    /// Number of self-play games
    #[arg(long, short = 'n')]
    pub episodes: Option<usize>,

    /// Learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Monte Carlo averaging policy (exponential or sample-mean); overrides a resumed table
    #[arg(long)]
    pub averaging: Option<Averaging>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save both tables every this many episodes
    #[arg(long)]
    pub checkpoint_every: Option<usize>,

    /// Forced openings cycled across episodes, e.g. `1,2,5`
    #[arg(long, value_delimiter = ',', conflicts_with = "free_openings")]
    pub openings: Option<Vec<usize>>,

    /// Let X choose its own first move
    #[arg(long)]
    pub free_openings: bool,

    /// JSON training configuration; flags override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Continue from the tables at --out-x / --out-o if they exist
    #[arg(long)]
    pub resume: bool,

    /// Log rolling outcome rates every this many games
    #[arg(long)]
    pub log_every: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Output table for X (`.json` or `.msgpack`)
    #[arg(long)]
    pub out_x: PathBuf,

    /// Output table for O (`.json` or `.msgpack`)
    #[arg(long)]
    pub out_o: PathBuf,
}

impl TrainArgs {
    /// Start from `--config` (or defaults) and apply every given flag.
    pub fn training_config(&self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .with_context(|| format!("Failed to read training config {}", path.display()))?,
            None => TrainingConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(alpha) = self.alpha {
            config.learning.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.learning.gamma = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            config.learning.epsilon = epsilon;
        }
        if let Some(averaging) = self.averaging {
            config.averaging = Some(averaging);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(every) = self.checkpoint_every {
            config.checkpoint_every = Some(every);
        }
        if let Some(openings) = &self.openings {
            config.openings = OpeningSchedule::Cycle(openings.clone());
        }
        if self.free_openings {
            config.openings = OpeningSchedule::None;
        }

        config.validate().context("Invalid training configuration")?;
        Ok(config)
    }
}

/// Fresh or resumed table for one side.
///
/// A resumed table keeps its own averaging policy unless the configuration
/// overrides it.
fn initial_store(
    path: &Path,
    resume: bool,
    config: &TrainingConfig,
    offset: u64,
) -> Result<ValueStore> {
    let store = if resume {
        values::load_or_empty(path)
            .with_context(|| format!("Failed to load table {}", path.display()))?
    } else {
        ValueStore::learning()
    };
    let averaging = config.averaging.unwrap_or_else(|| store.averaging());
    let store = store.with_averaging(averaging);

    if averaging == Averaging::SampleMean && !store.is_empty() && store.total_visits() == 0 {
        warn!(
            "{} has no visit counts; sample-mean training will overwrite each loaded value \
             with its first return (resume from a .msgpack table to keep them)",
            path.display()
        );
    }

    Ok(match config.seed {
        Some(seed) => store.with_seed(seed.wrapping_add(offset)),
        None => store,
    })
}

fn save_tables(
    x: &dyn Learner,
    o: &dyn Learner,
    out_x: &Path,
    out_o: &Path,
) -> crate::Result<()> {
    if let Some(store) = x.value_store() {
        values::save(store, out_x)?;
    }
    if let Some(store) = o.value_store() {
        values::save(store, out_o)?;
    }
    Ok(())
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.training_config()?;
    let kind = AgentKind::from(args.algorithm);

    print_section(&format!("Training {kind} for {} episodes", config.episodes));
    print_kv("alpha", &config.learning.alpha.to_string());
    print_kv("gamma", &config.learning.gamma.to_string());
    print_kv("epsilon", &config.learning.epsilon.to_string());

    let x_store = initial_store(&args.out_x, args.resume, &config, 2)?;
    let o_store = initial_store(&args.out_o, args.resume, &config, 3)?;
    if args.algorithm == Algorithm::Mc {
        print_kv("averaging X", &x_store.averaging().to_string());
        print_kv("averaging O", &o_store.averaging().to_string());
    }
    let mut x = build_agent(kind, Player::X, x_store, config.learning, None)?;
    let mut o = build_agent(kind, Player::O, o_store, config.learning, None)?;

    let mut tracker = OpeningTracker::default();
    let mut opener_values = OpenerValueTracker::default();
    let summary = {
        let (out_x, out_o) = (&args.out_x, &args.out_o);
        let mut session = TrainingSession::new(config.clone())
            .with_observer(Box::new(&mut tracker))
            .with_observer(Box::new(&mut opener_values))
            .with_checkpoint(move |_, x, o| save_tables(x, o, out_x, out_o));
        if !args.no_progress {
            session = session.with_observer(Box::new(ProgressObserver::new()));
        }
        if let Some(every) = args.log_every {
            session = session.with_observer(Box::new(LoggingObserver::new(every)));
        }
        session.run(x.as_mut(), o.as_mut())?
    };

    save_tables(&*x, &*o, &args.out_x, &args.out_o).context("Failed to save trained tables")?;

    print_subsection("Results");
    print_summary(&summary);

    print_subsection("Last games per opening");
    for opening in tracker.openings() {
        if let Some(rates) = tracker.rolling_rates(opening) {
            let label = opening.map_or_else(|| "free".to_string(), |p| format!("opening {p}"));
            print_rates(&label, &rates);
        }
    }
    print_rates("pooled", &tracker.pooled_rates());

    if let Some(values) = opener_values.latest() {
        print_subsection("X opening values");
        for ((label, position), value) in ["corner", "side", "centre"]
            .into_iter()
            .zip(OPENER_POSITIONS)
            .zip(values)
        {
            let value = value.map_or_else(|| "unseen".to_string(), |v| format!("{v:+.4}"));
            print_kv(&format!("{label} ({position})"), &value);
        }
    }

    print_subsection("Tables");
    for (learner, path) in [(&*x, &args.out_x), (&*o, &args.out_o)] {
        let states = learner.value_store().map_or(0, ValueStore::len);
        print_kv(learner.name(), &format!("{states} states -> {}", path.display()));
    }

    Ok(())
}
