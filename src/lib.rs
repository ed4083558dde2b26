//! # MC Options - Monte Carlo European Option Pricing
//!
//! Estimates the fair value of European calls and puts by simulating the
//! underlying at maturity under Black-Scholes geometric Brownian motion,
//! with spot and volatility taken from historical market data.
//!
//! ## Key Components
//!
//! - **Sampler**: seeded standard normal draws, sequential or parallel
//! - **GBM**: exact terminal prices `S_T = S_0 exp((r - σ²/2)T + σ√T Z)`
//! - **Pricing**: payoffs, discounted mean, standard error
//! - **Convergence**: independent estimates over a list of sample sizes
//! - **Data Fetching**: Yahoo Finance daily closes → spot and √252-annualized
//!   volatility
//! - **Analysis**: volatility/strike sweeps and validation against quotes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mc_options::prelude::*;
//!
//! // Spot and historical volatility from Yahoo Finance
//! let market = YahooClient::new()?.market_parameters("AAPL")?;
//!
//! // At-the-money 3 month call
//! let params = market.pricing_parameters(market.spot_price.round(), 0.25, 0.045, OptionType::Call)?;
//!
//! let mut rng = seeded_rng(Some(42));
//! let run = price_option(&params, 50_000, &mut rng)?;
//! println!("Call: {:.4} ± {:.4}", run.price(), run.estimate.standard_error);
//!
//! let trace = analyze_convergence(&params, &DEFAULT_SAMPLE_SIZES, &mut rng)?;
//! # Ok::<(), PricingError>(())
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - American exercise or path-dependent payoffs
//! - Variance reduction (antithetic or control variates)
//! - Greeks
//! - Multi-asset simulation

pub mod analysis;
pub mod core;
pub mod data;
pub mod models;
pub mod pricing;
pub mod report;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        EngineConfig, OptionType, PricingError, PricingParameters, PricingResult, RunConfig,
        DEFAULT_SAMPLE_SIZES,
    };

    // Data fetching
    pub use crate::data::{
        CacheConfig, CachedProvider, DailyClose, DataCache, MarketDataProvider,
        MarketParameters, PriceHistory, StaticMarketData, YahooClient,
    };

    // Models
    pub use crate::models::{
        bs_price, bs_price_params, norm_cdf, sample, sample_parallel, sample_with, seeded_rng,
        simulate_terminal_prices, SampleSet, SimRng,
    };

    // Pricing
    pub use crate::pricing::{
        analyze_convergence, analyze_convergence_parallel, estimate_price, payoffs,
        price_call_and_put, price_option, summarize, ConvergencePoint, ConvergenceTrace,
        MonteCarloEngine, PriceEstimate, PricingRun, SummaryStatistics,
    };

    // Analysis
    pub use crate::analysis::{
        read_market_quotes_file, strike_sweep, validate_against_market, volatility_sweep,
        MarketQuote, SensitivitySweep, ValidationReport,
    };
}

// Re-export main types at crate root
pub use crate::core::{PricingError, PricingResult};
pub use crate::pricing::{MonteCarloEngine, PricingRun};
