//! Black-Scholes closed form
//!
//! The exact value of a European option under the same GBM dynamics the
//! Monte Carlo engine simulates. Used as the benchmark when judging
//! estimator error.

use std::f64::consts::SQRT_2;
use statrs::function::erf::erfc;

use crate::core::{OptionType, PricingParameters};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, vol, time) - vol * time.sqrt()
}

/// Black-Scholes European option price (no dividends)
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> f64 {
    if time <= 0.0 {
        return option_type.intrinsic(spot, strike);
    }

    let df = (-rate * time).exp();

    if vol <= 0.0 {
        // Zero vol = intrinsic value of the forward, discounted
        let forward = spot * (rate * time).exp();
        return df * option_type.intrinsic(forward, strike);
    }

    let d1 = d1(spot, strike, rate, vol, time);
    let d2 = d2(spot, strike, rate, vol, time);

    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - strike * df * norm_cdf(d2),
        OptionType::Put => strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}

/// Closed-form value for a parameter set
pub fn price_params(params: &PricingParameters) -> f64 {
    price(
        params.spot,
        params.strike,
        params.rate,
        params.volatility,
        params.maturity,
        params.option_type,
    )
}
