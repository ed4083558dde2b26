//! Studies built on the pricing engine
//!
//! - Sensitivity of the price to volatility and strike
//! - Validation of simulated prices against market quotes

pub mod sensitivity;
pub mod validation;

pub use sensitivity::*;
pub use validation::*;
