//! Monte Carlo pricing engine
//!
//! - Payoff evaluation
//! - Discounted mean estimator with standard error
//! - Pricing orchestrator and configured engine
//! - Convergence sweeps over sample counts
//! - Summary statistics of a run

pub mod convergence;
pub mod engine;
pub mod estimator;
pub mod payoff;
pub mod statistics;

pub use convergence::*;
pub use engine::*;
pub use estimator::*;
pub use payoff::*;
pub use statistics::*;
