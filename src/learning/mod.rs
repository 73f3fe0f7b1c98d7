//! Value-function learning: selection policy and the two update rules
//!
//! Values are always from X's point of view (X win = +1, O win = −1), so X
//! maximizes and O minimizes the same table. Each agent updates only its
//! own afterstates, the boards right after its own moves.
//!
//! | Rule | Target for afterstate `k` steps from the end |
//! |------|---------------------------------------------|
//! | TD(0) | `γ · v(next afterstate)`, exact reward at a terminal end |
//! | Monte Carlo | `r · γ^k`, averaged per [`crate::values::Averaging`] |

pub mod config;
pub mod monte_carlo;
pub mod policy;
pub mod td;

pub use config::LearningConfig;
pub use monte_carlo::{discounted_return, monte_carlo_update};
pub use policy::{Choice, epsilon_greedy, greedy_move, random_move};
pub use td::td_update;
