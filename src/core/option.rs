//! Option kind and pricing parameters
//!
//! Vanilla European options only: a call or put on a single underlying,
//! settled at maturity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{PricingError, PricingResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Payoff at maturity for a terminal price
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Does a terminal price finish in the money?
    pub fn is_itm(&self, spot: f64, strike: f64) -> bool {
        match self {
            OptionType::Call => spot > strike,
            OptionType::Put => spot < strike,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    /// Accepts "call" or "put" in any case. Anything else is rejected rather
    /// than defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricingError::invalid_argument(format!(
                "unknown option type '{}', expected 'call' or 'put'",
                other
            ))),
        }
    }
}

/// Inputs to a single European option valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    /// Spot price S0
    pub spot: f64,
    /// Strike K
    pub strike: f64,
    /// Time to maturity T in years
    pub maturity: f64,
    /// Annualized risk-free rate r (may be zero or negative)
    pub rate: f64,
    /// Annualized volatility σ
    pub volatility: f64,
    /// Call or put
    pub option_type: OptionType,
}

impl PricingParameters {
    /// Build and validate a parameter set
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> PricingResult<Self> {
        let params = Self {
            spot,
            strike,
            maturity,
            rate,
            volatility,
            option_type,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn call(spot: f64, strike: f64, maturity: f64, rate: f64, volatility: f64) -> PricingResult<Self> {
        Self::new(spot, strike, maturity, rate, volatility, OptionType::Call)
    }

    pub fn put(spot: f64, strike: f64, maturity: f64, rate: f64, volatility: f64) -> PricingResult<Self> {
        Self::new(spot, strike, maturity, rate, volatility, OptionType::Put)
    }

    /// Check S0 > 0, K > 0, T > 0, σ >= 0 and that everything is finite.
    pub fn validate(&self) -> PricingResult<()> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(PricingError::invalid_argument(format!(
                "spot price must be positive and finite, got {}",
                self.spot
            )));
        }
        if !(self.strike.is_finite() && self.strike > 0.0) {
            return Err(PricingError::invalid_argument(format!(
                "strike must be positive and finite, got {}",
                self.strike
            )));
        }
        if !(self.maturity.is_finite() && self.maturity > 0.0) {
            return Err(PricingError::invalid_argument(format!(
                "time to maturity must be positive and finite, got {}",
                self.maturity
            )));
        }
        if !self.rate.is_finite() {
            return Err(PricingError::invalid_argument(format!(
                "risk-free rate must be finite, got {}",
                self.rate
            )));
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(PricingError::invalid_argument(format!(
                "volatility must be non-negative and finite, got {}",
                self.volatility
            )));
        }
        Ok(())
    }

    /// Discount factor exp(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Forward price S0 * exp(rT)
    pub fn forward(&self) -> f64 {
        self.spot * (self.rate * self.maturity).exp()
    }

    /// Right-hand side of put-call parity: S0 - K * exp(-rT)
    pub fn parity_value(&self) -> f64 {
        self.spot - self.strike * self.discount_factor()
    }

    pub fn with_volatility(&self, volatility: f64) -> Self {
        Self { volatility, ..*self }
    }

    pub fn with_strike(&self, strike: f64) -> Self {
        Self { strike, ..*self }
    }

    pub fn with_option_type(&self, option_type: OptionType) -> Self {
        Self { option_type, ..*self }
    }
}
