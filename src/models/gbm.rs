//! Risk-neutral geometric Brownian motion at maturity
//!
//! Uses the exact solution of dS = rS dt + σS dW:
//!
//! ```text
//! S_T = S_0 * exp((r - σ²/2)T + σ√T Z),   Z ~ N(0,1)
//! ```
//!
//! No time stepping is needed for European payoffs.

use rayon::prelude::*;

/// Drift and diffusion terms of the log terminal price
#[derive(Debug, Clone, Copy)]
struct LogTerms {
    drift: f64,
    diffusion: f64,
}

impl LogTerms {
    fn new(maturity: f64, rate: f64, volatility: f64) -> Self {
        Self {
            drift: (rate - 0.5 * volatility * volatility) * maturity,
            diffusion: volatility * maturity.sqrt(),
        }
    }

    #[inline]
    fn terminal(&self, spot: f64, z: f64) -> f64 {
        spot * (self.drift + self.diffusion * z).exp()
    }
}

/// Terminal price for a single normal draw
#[inline]
pub fn terminal_price(spot: f64, maturity: f64, rate: f64, volatility: f64, z: f64) -> f64 {
    LogTerms::new(maturity, rate, volatility).terminal(spot, z)
}

/// Map standard normal draws to terminal prices, one per draw, in order.
///
/// With σ = 0 every price is exactly `spot * exp(rate * maturity)`.
pub fn simulate_terminal_prices(
    spot: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    samples: &[f64],
) -> Vec<f64> {
    let terms = LogTerms::new(maturity, rate, volatility);
    samples.iter().map(|&z| terms.terminal(spot, z)).collect()
}

/// Same as [`simulate_terminal_prices`], evaluated across the rayon pool
pub fn simulate_terminal_prices_par(
    spot: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    samples: &[f64],
) -> Vec<f64> {
    let terms = LogTerms::new(maturity, rate, volatility);
    samples.par_iter().map(|&z| terms.terminal(spot, z)).collect()
}
