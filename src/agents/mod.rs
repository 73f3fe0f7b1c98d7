//! Agents that play through the [`Learner`] port
//!
//! - [`TdAgent`] and [`MonteCarloAgent`] learn ε-greedily from their own afterstates
//! - [`GreedyAgent`] plays a frozen table (optimal when fed solver values)
//! - [`RandomAgent`] is the uniform baseline

mod value_core;
pub mod greedy;
pub mod monte_carlo;
pub mod random;
pub mod td;

use std::{fmt, str::FromStr};

pub use greedy::GreedyAgent;
pub use monte_carlo::MonteCarloAgent;
pub use random::RandomAgent;
pub use td::TdAgent;

use crate::{
    Error, Result, learning::LearningConfig, ports::Learner, tictactoe::Player, values::ValueStore,
};

/// Selectable agent families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Greedy,
    TemporalDifference,
    MonteCarlo,
    Random,
    /// Tree-search player. Recognised by name, not built.
    TreeSearch,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentKind::Greedy => "greedy",
            AgentKind::TemporalDifference => "td",
            AgentKind::MonteCarlo => "mc",
            AgentKind::Random => "random",
            AgentKind::TreeSearch => "tree-search",
        };
        f.write_str(label)
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" | "optimal" => Ok(AgentKind::Greedy),
            "td" | "td0" | "temporal-difference" => Ok(AgentKind::TemporalDifference),
            "mc" | "monte-carlo" | "montecarlo" => Ok(AgentKind::MonteCarlo),
            "random" => Ok(AgentKind::Random),
            "tree-search" | "mcts" => Ok(AgentKind::TreeSearch),
            _ => Err(Error::ParseAgentKind {
                input: s.to_string(),
                expected: "greedy, td, mc, random, tree-search".to_string(),
            }),
        }
    }
}

/// Build a boxed agent of the given kind.
///
/// `store` backs value-driven agents and is dropped for [`AgentKind::Random`].
/// `seed` fixes the move RNG when given.
///
/// # Errors
///
/// Returns [`Error::UnsupportedAgent`] for [`AgentKind::TreeSearch`].
pub fn build_agent(
    kind: AgentKind,
    player: Player,
    store: ValueStore,
    config: LearningConfig,
    seed: Option<u64>,
) -> Result<Box<dyn Learner>> {
    let mut agent: Box<dyn Learner> = match kind {
        AgentKind::Greedy => Box::new(GreedyAgent::new(player, store)),
        AgentKind::TemporalDifference => Box::new(TdAgent::new(player, store, config)),
        AgentKind::MonteCarlo => Box::new(MonteCarloAgent::new(player, store, config)),
        AgentKind::Random => Box::new(RandomAgent::new(player)),
        AgentKind::TreeSearch => {
            return Err(Error::UnsupportedAgent {
                kind: kind.to_string(),
            });
        }
    };
    if let Some(seed) = seed {
        agent.set_rng_seed(seed)?;
    }
    Ok(agent)
}
