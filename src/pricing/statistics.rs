//! Descriptive statistics of a pricing run

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::core::{OptionType, PricingError, PricingResult};

/// Summary of simulated terminal prices and payoffs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub sample_size: usize,
    /// Mean of S_T
    pub mean_terminal_price: f64,
    /// Population standard deviation of S_T
    pub std_terminal_price: f64,
    /// Fraction of S_T above the strike (call) or below it (put)
    pub prob_itm: f64,
    /// Fraction of payoffs that are exactly zero
    pub zero_payoff_fraction: f64,
    /// Undiscounted mean payoff
    pub mean_payoff: f64,
}

/// Summarize a run from its terminal prices and payoffs
pub fn summarize(
    terminal_prices: &[f64],
    payoffs: &[f64],
    strike: f64,
    option_type: OptionType,
) -> PricingResult<SummaryStatistics> {
    if terminal_prices.is_empty() {
        return Err(PricingError::invalid_argument(
            "cannot summarize an empty sample",
        ));
    }
    if terminal_prices.len() != payoffs.len() {
        return Err(PricingError::invalid_argument(format!(
            "terminal prices ({}) and payoffs ({}) differ in length",
            terminal_prices.len(),
            payoffs.len()
        )));
    }

    let n = terminal_prices.len() as f64;
    let itm = terminal_prices
        .iter()
        .filter(|&&st| option_type.is_itm(st, strike))
        .count();
    let zero = payoffs.iter().filter(|&&p| p == 0.0).count();

    Ok(SummaryStatistics {
        sample_size: terminal_prices.len(),
        mean_terminal_price: terminal_prices.iter().mean(),
        std_terminal_price: terminal_prices.iter().population_std_dev(),
        prob_itm: itm as f64 / n,
        zero_payoff_fraction: zero as f64 / n,
        mean_payoff: payoffs.iter().mean(),
    })
}
