//! Run and engine configuration

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::error::{PricingError, PricingResult};
use super::option::OptionType;

/// Sample sizes used by the default convergence study
pub const DEFAULT_SAMPLE_SIZES: [usize; 8] = [100, 500, 1000, 2000, 5000, 10000, 20000, 50000];

/// Configuration for the Monte Carlo engine itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the random source. `None` draws a seed from OS entropy.
    pub seed: Option<u64>,
    /// Generate samples in parallel chunks
    pub parallel: bool,
    /// Samples per chunk when `parallel` is set
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: Some(42),
            parallel: false,
            chunk_size: 8192,
        }
    }
}

impl EngineConfig {
    /// Deterministic runs from a fixed seed
    pub fn reproducible(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Fresh entropy on every run
    pub fn unseeded() -> Self {
        Self {
            seed: None,
            ..Default::default()
        }
    }

    pub fn with_parallel(mut self, chunk_size: usize) -> Self {
        self.parallel = true;
        self.chunk_size = chunk_size;
        self
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.parallel && self.chunk_size == 0 {
            return Err(PricingError::invalid_argument("chunk_size must be positive"));
        }
        Ok(())
    }
}

/// Configuration for a full pricing study: market inputs, contract, sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Ticker of the underlying
    pub symbol: String,
    /// Strike; `None` means at-the-money (spot rounded to the nearest unit)
    pub strike: Option<f64>,
    /// Time to maturity in years
    pub maturity: f64,
    /// Annualized risk-free rate
    pub rate: f64,
    /// Samples for the headline price
    pub num_sims: usize,
    /// Sample sizes for the convergence study
    pub sample_sizes: Vec<usize>,
    pub option_type: OptionType,
    /// Yahoo Finance range for the volatility estimate ("6mo", "1y", ...)
    pub history_range: String,
    pub engine: EngineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            strike: None,
            maturity: 0.25,
            rate: 0.045,
            num_sims: 50_000,
            sample_sizes: DEFAULT_SAMPLE_SIZES.to_vec(),
            option_type: OptionType::Call,
            history_range: "1y".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> PricingResult<Self> {
        let file = File::open(path.as_ref())?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(PricingError::invalid_argument("symbol must not be empty"));
        }
        if let Some(k) = self.strike {
            if !(k.is_finite() && k > 0.0) {
                return Err(PricingError::invalid_argument(format!(
                    "strike must be positive, got {}",
                    k
                )));
            }
        }
        if !(self.maturity.is_finite() && self.maturity > 0.0) {
            return Err(PricingError::invalid_argument(format!(
                "maturity must be positive, got {}",
                self.maturity
            )));
        }
        if self.num_sims == 0 {
            return Err(PricingError::invalid_argument("num_sims must be positive"));
        }
        if self.sample_sizes.is_empty() || self.sample_sizes.contains(&0) {
            return Err(PricingError::invalid_argument(
                "sample_sizes must be a non-empty list of positive counts",
            ));
        }
        self.engine.validate()
    }

    /// Strike to use for a given spot: the configured one, or ATM
    pub fn strike_for_spot(&self, spot: f64) -> f64 {
        self.strike.unwrap_or_else(|| spot.round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_sizes.len(), 8);
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.strike_for_spot(185.40), 185.0);
        assert_eq!(config.strike_for_spot(185.60), 186.0);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = RunConfig::default();
        config.sample_sizes.clear();
        assert!(config.validate().is_err());

        let config = RunConfig {
            num_sims: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RunConfig {
            engine: EngineConfig::default().with_parallel(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"symbol": "MSFT", "strike": 400.0, "option_type": "put", "engine": {{"seed": 7, "parallel": true, "chunk_size": 1000}}}}"#
        )
        .unwrap();

        let config = RunConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.symbol, "MSFT");
        assert_eq!(config.strike, Some(400.0));
        assert_eq!(config.option_type, OptionType::Put);
        assert_eq!(config.engine.seed, Some(7));
        assert!(config.engine.parallel);
        // Defaults for the rest
        assert_eq!(config.maturity, 0.25);
        assert_eq!(config.num_sims, 50_000);
    }

    #[test]
    fn test_from_json_rejects_bad_option_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"option_type": "straddle"}}"#).unwrap();
        assert!(RunConfig::from_json_file(file.path()).is_err());
    }
}
