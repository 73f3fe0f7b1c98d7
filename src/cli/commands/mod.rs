pub mod evaluate;
pub mod solve;
pub mod train;

/// Reject a discount outside (0, 1].
pub fn check_gamma(gamma: f64) -> anyhow::Result<()> {
    anyhow::ensure!(
        gamma > 0.0 && gamma <= 1.0,
        "gamma {gamma} must lie in (0, 1]"
    );
    Ok(())
}
