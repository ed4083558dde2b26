//! Simulation models
//!
//! Implements:
//! - Standard normal sampling (seeded, optionally parallel)
//! - Exact GBM terminal prices
//! - Black-Scholes closed form (benchmark)

pub mod black_scholes;
pub mod gbm;
pub mod sampler;

pub use black_scholes::{norm_cdf, price as bs_price, price_params as bs_price_params};
pub use gbm::*;
pub use sampler::*;
