//! Solve command - exact values by backward induction

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{create_spinner, format_number, print_kv, print_section, print_terminals},
    solver::{DEFAULT_GAMMA, ExactSolver},
    tictactoe::GameState,
    values,
};

#[derive(Parser, Debug)]
#[command(about = "Compute the exact value of every reachable state")]
pub struct SolveArgs {
    /// Discount applied per ply
    #[arg(long, default_value_t = DEFAULT_GAMMA)]
    pub gamma: f64,

    /// Output table (`.json` or `.msgpack`)
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

pub fn execute(args: SolveArgs) -> Result<()> {
    super::check_gamma(args.gamma)?;

    let spinner = create_spinner("Solving the game tree...")?;
    let solution = ExactSolver::new(args.gamma).solve();
    spinner.finish_and_clear();

    print_section("Exact solution");
    print_kv("gamma", &solution.gamma().to_string());
    print_kv("Canonical states", &format_number(solution.len()));
    let sizes: Vec<String> = solution
        .layer_sizes()
        .iter()
        .map(ToString::to_string)
        .collect();
    print_kv("Per ply", &sizes.join(" "));
    print_terminals("Terminal states", &solution.terminal_counts());
    if let Some(value) = solution.value(&GameState::new()) {
        print_kv("Empty board", &format!("{value}"));
    }

    values::save(&solution.store(), &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("\nSaved to {}", args.output.display());
    Ok(())
}
