//! tictactoe-rl CLI - value learning for Tic-Tac-Toe
//!
//! - `train`: self-play TD(0) or Monte Carlo training of X and O tables
//! - `solve`: exact values by backward induction
//! - `evaluate`: compare trained tables with the exact solution

use anyhow::Result;
use clap::{Parser, Subcommand};
use tictactoe_rl::cli::commands::{evaluate, solve, train};

#[derive(Parser)]
#[command(name = "tictactoe-rl")]
#[command(version, about = "Reinforcement learning for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train X and O value tables by self-play
    Train(Box<train::TrainArgs>),

    /// Compute exact values for every reachable state
    Solve(solve::SolveArgs),

    /// Compare trained tables with the exact solution
    Evaluate(evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => train::execute(*args),
        Commands::Solve(args) => solve::execute(args),
        Commands::Evaluate(args) => evaluate::execute(args),
    }
}
