//! Training hyperparameters

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Step size, discount and exploration rate for one agent.
///
/// Passed explicitly to every selection and update call so runs with
/// different parameters never share state.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::learning::LearningConfig;
///
/// let config = LearningConfig::default().with_alpha(0.2).with_epsilon(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ, applied once per afterstate step
    pub gamma: f64,
    /// Exploration rate ε
    pub epsilon: f64,
}

impl LearningConfig {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        Self {
            alpha,
            gamma,
            epsilon,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Same parameters with exploration turned off.
    pub fn greedy(self) -> Self {
        self.with_epsilon(0.0)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `0 ≤ α ≤ 1`,
    /// `0 < γ ≤ 1` and `0 ≤ ε ≤ 1`.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });
        if !(0.0..=1.0).contains(&self.alpha) {
            return invalid(format!("alpha {} must lie in [0, 1]", self.alpha));
        }
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return invalid(format!("gamma {} must lie in (0, 1]", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon {} must lie in [0, 1]", self.epsilon));
        }
        Ok(())
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self::new(0.1, 0.9, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LearningConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(LearningConfig::default().with_alpha(1.5).validate().is_err());
        assert!(LearningConfig::default().with_gamma(0.0).validate().is_err());
        assert!(LearningConfig::default().with_epsilon(-0.1).validate().is_err());
        assert!(LearningConfig::default().with_alpha(f64::NAN).validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: LearningConfig = serde_json::from_str(r#"{"alpha": 0.3}"#).unwrap();
        assert_eq!(config.alpha, 0.3);
        assert_eq!(config.gamma, 0.9);
    }
}
