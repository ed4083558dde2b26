//! Core data types for the Monte Carlo pricer
//!
//! Defines fundamental types:
//! - OptionType: call/put, parsed strictly
//! - PricingParameters: validated inputs to a valuation
//! - EngineConfig / RunConfig: seeds, parallelism, study setup
//! - PricingError: error taxonomy

pub mod config;
pub mod error;
pub mod option;

pub use config::*;
pub use error::*;
pub use option::*;
