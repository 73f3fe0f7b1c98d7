//! Evaluate command - compare trained tables with the exact solution

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    agents::GreedyAgent,
    cli::output::{
        print_comparison, print_kv, print_playthrough, print_record, print_section,
        print_subsection,
    },
    pipeline::{
        AgentRecord, DEFAULT_OPENINGS, HeadToHead, ValueComparison, compare_values, head_to_head,
        playthroughs, rates_vs_random,
    },
    solver::{DEFAULT_GAMMA, ExactSolver},
    tictactoe::Player,
    values,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate trained X and O tables")]
pub struct EvaluateArgs {
    /// Table trained for X
    #[arg(long)]
    pub x_table: PathBuf,

    /// Table trained for O
    #[arg(long)]
    pub o_table: PathBuf,

    /// Games against the random player, per side
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for the random opponent
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Discount used by the solver; match the training gamma
    #[arg(long, default_value_t = DEFAULT_GAMMA)]
    pub gamma: f64,

    /// Openings for head-to-head play and the learned X vs learned O games
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_OPENINGS)]
    pub openings: Vec<usize>,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    gamma: f64,
    x_values: ValueComparison,
    o_values: ValueComparison,
    head_to_head: Vec<HeadToHead>,
    x_vs_random: AgentRecord,
    o_vs_random: AgentRecord,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    super::check_gamma(args.gamma)?;

    // Missing tables degrade the report instead of aborting it.
    let x_store = values::load_or_empty(&args.x_table)
        .with_context(|| format!("Failed to load {}", args.x_table.display()))?;
    let o_store = values::load_or_empty(&args.o_table)
        .with_context(|| format!("Failed to load {}", args.o_table.display()))?;

    let solution = ExactSolver::new(args.gamma).solve();

    let x_values = compare_values(&x_store, &solution);
    let o_values = compare_values(&o_store, &solution);
    let games = head_to_head(&x_store, &o_store, &solution, &args.openings)?;
    let pooled_games = playthroughs(&x_store, &o_store, &args.openings)?;

    let mut x_agent = GreedyAgent::new(Player::X, x_store);
    let mut o_agent = GreedyAgent::new(Player::O, o_store);
    let x_vs_random = rates_vs_random(&mut x_agent, args.games, args.seed)?;
    let o_vs_random = rates_vs_random(&mut o_agent, args.games, args.seed.wrapping_add(1))?;

    print_section("Evaluation against the exact solution");
    print_subsection(&format!("X table ({})", args.x_table.display()));
    print_comparison(&x_values);
    print_subsection(&format!("O table ({})", args.o_table.display()));
    print_comparison(&o_values);

    print_subsection("Against optimal play");
    for game in &games {
        print_kv(
            &format!("opening {}", game.opening),
            &format!(
                "learned X: {} / learned O: {}",
                game.learned_x, game.learned_o
            ),
        );
    }

    print_subsection("Learned X vs learned O (pooled values)");
    for game in &pooled_games {
        print_playthrough(game);
    }

    print_subsection(&format!("Against random ({} games per side)", args.games));
    print_record("X table", &x_vs_random);
    print_record("O table", &o_vs_random);

    if let Some(path) = &args.export {
        let report = EvaluationReport {
            gamma: args.gamma,
            x_values,
            o_values,
            head_to_head: games,
            x_vs_random,
            o_vs_random,
        };
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        println!("\nExported to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::values::ValueStore;

    fn args(dir: &TempDir, gamma: &str) -> EvaluateArgs {
        let x_table = dir.path().join("x.json");
        let o_table = dir.path().join("o.json");
        EvaluateArgs::parse_from([
            "evaluate",
            "--x-table",
            x_table.to_str().unwrap(),
            "--o-table",
            o_table.to_str().unwrap(),
            "--games",
            "10",
            "--gamma",
            gamma,
        ])
    }

    #[test]
    fn gamma_outside_the_unit_interval_is_rejected() {
        let dir = TempDir::new().unwrap();
        for gamma in ["1.5", "0"] {
            let err = execute(args(&dir, gamma)).unwrap_err();
            assert!(err.to_string().contains("gamma"), "{err}");
        }
    }

    #[test]
    fn evaluates_tables_and_exports_a_report() {
        let dir = TempDir::new().unwrap();
        let solution = ExactSolver::default().solve();
        values::save(&solution.store(), dir.path().join("x.json")).unwrap();
        values::save(&ValueStore::learning(), dir.path().join("o.json")).unwrap();
        let mut args = args(&dir, "0.9");
        let report = dir.path().join("report.json");
        args.export = Some(report.clone());

        execute(args).unwrap();

        let text = std::fs::read_to_string(report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["x_values"]["overlap"], 765);
        assert_eq!(parsed["head_to_head"].as_array().unwrap().len(), 3);
    }
}
