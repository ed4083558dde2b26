//! European payoffs at maturity

use crate::core::OptionType;

/// max(S_T - K, 0) for a call, max(K - S_T, 0) for a put
#[inline]
pub fn payoff(terminal_price: f64, strike: f64, option_type: OptionType) -> f64 {
    option_type.intrinsic(terminal_price, strike)
}

/// Elementwise payoffs, same order and length as the input
pub fn payoffs(terminal_prices: &[f64], strike: f64, option_type: OptionType) -> Vec<f64> {
    terminal_prices
        .iter()
        .map(|&st| payoff(st, strike, option_type))
        .collect()
}
