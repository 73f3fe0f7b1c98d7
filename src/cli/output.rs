//! Output formatting for CLI

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    pipeline::{AgentRecord, OutcomeRates, Playthrough, TrainingSummary, ValueComparison},
    solver::TerminalCounts,
};

/// Create a spinner for long computations
pub fn create_spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn print_summary(summary: &TrainingSummary) {
    print_kv("Games", &format_number(summary.games));
    print_kv(
        "X wins",
        &format!("{} ({})", summary.x_wins, percent(summary.x_win_rate())),
    );
    print_kv(
        "O wins",
        &format!("{} ({})", summary.o_wins, percent(summary.o_win_rate())),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", summary.draws, percent(summary.draw_rate())),
    );
}

pub fn print_rates(label: &str, rates: &OutcomeRates) {
    print_kv(
        label,
        &format!(
            "X {} / O {} / draw {}",
            percent(rates.x_win),
            percent(rates.o_win),
            percent(rates.draw)
        ),
    );
}

pub fn print_terminals(label: &str, counts: &TerminalCounts) {
    print_kv(
        label,
        &format!(
            "{} (draws {}, X wins {}, O wins {})",
            counts.total(),
            counts.draws,
            counts.x_wins,
            counts.o_wins
        ),
    );
}

pub fn print_comparison(comparison: &ValueComparison) {
    let rmse = comparison
        .rmse
        .map_or_else(|| "n/a".to_string(), |rmse| format!("{rmse:.4}"));
    print_kv("RMSE", &rmse);
    print_kv("Shared states", &format_number(comparison.overlap));
    print_kv("Unseen states", &format_number(comparison.unseen));
    print_terminals("Missing terminals", &comparison.missing_terminals);
}

pub fn print_record(label: &str, record: &AgentRecord) {
    print_kv(
        label,
        &format!(
            "win {} / draw {} / loss {}",
            percent(record.win_rate()),
            percent(record.draw_rate()),
            percent(record.loss_rate())
        ),
    );
}

/// Print each board of a playthrough with its value
pub fn print_playthrough(game: &Playthrough) {
    print_kv(&format!("opening {}", game.opening), &game.status.to_string());
    for (ply, (state, value)) in game.steps.iter().enumerate() {
        let value = value.map_or_else(|| "unseen".to_string(), |value| format!("{value:+.4}"));
        println!("    ply {}: {value}", ply + 1);
        for row in state.to_string().lines() {
            println!("      {row}");
        }
    }
}
