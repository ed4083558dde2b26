//! Market parameter providers
//!
//! The pricing engine only needs a spot price and an annualized volatility.
//! Where they come from (Yahoo Finance, a cache, fixed inputs) sits behind
//! [`MarketDataProvider`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::{OptionType, PricingError, PricingParameters, PricingResult};

/// Spot and volatility for one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    pub symbol: String,
    pub spot_price: f64,
    pub annualized_volatility: f64,
}

impl MarketParameters {
    /// Combine with contract terms into validated pricing inputs
    pub fn pricing_parameters(
        &self,
        strike: f64,
        maturity: f64,
        rate: f64,
        option_type: OptionType,
    ) -> PricingResult<PricingParameters> {
        PricingParameters::new(
            self.spot_price,
            strike,
            maturity,
            rate,
            self.annualized_volatility,
            option_type,
        )
    }
}

/// Source of spot and volatility by symbol
pub trait MarketDataProvider {
    /// Fails with `DataUnavailable` when the symbol has no usable history
    fn market_parameters(&self, symbol: &str) -> PricingResult<MarketParameters>;
}

/// Fixed parameters, for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    entries: HashMap<String, MarketParameters>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol. Spot must be positive and volatility non-negative.
    pub fn with(mut self, symbol: &str, spot_price: f64, annualized_volatility: f64) -> PricingResult<Self> {
        if !(spot_price.is_finite() && spot_price > 0.0) {
            return Err(PricingError::invalid_argument(format!(
                "spot price for {} must be positive, got {}",
                symbol, spot_price
            )));
        }
        if !(annualized_volatility.is_finite() && annualized_volatility >= 0.0) {
            return Err(PricingError::invalid_argument(format!(
                "volatility for {} must be non-negative, got {}",
                symbol, annualized_volatility
            )));
        }

        self.entries.insert(
            symbol.to_ascii_uppercase(),
            MarketParameters {
                symbol: symbol.to_string(),
                spot_price,
                annualized_volatility,
            },
        );
        Ok(self)
    }
}

impl MarketDataProvider for StaticMarketData {
    fn market_parameters(&self, symbol: &str) -> PricingResult<MarketParameters> {
        self.entries
            .get(&symbol.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| PricingError::data_unavailable(format!("no market data for {}", symbol)))
    }
}
