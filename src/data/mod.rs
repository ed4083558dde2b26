//! Market data
//!
//! Handles:
//! - Yahoo Finance daily closes
//! - Spot and historical volatility estimation
//! - Local caching and fixed offline inputs

pub mod cache;
pub mod history;
pub mod provider;
pub mod yahoo;

pub use cache::*;
pub use history::*;
pub use provider::*;
pub use yahoo::*;
