//! Local data caching
//!
//! Caches price histories locally to reduce API calls and enable offline
//! analysis.

use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::PathBuf;

use super::history::PriceHistory;
use super::provider::{MarketDataProvider, MarketParameters};
use super::yahoo::{YahooClient, DEFAULT_RANGE};
use crate::core::PricingResult;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache directory
    pub cache_dir: PathBuf,
    /// Maximum age before refresh (in hours)
    pub max_age_hours: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data/cache"),
            max_age_hours: 24,
            enabled: true,
        }
    }
}

/// Price history cache on disk, one JSON file per (symbol, range)
pub struct DataCache {
    config: CacheConfig,
}

impl DataCache {
    pub fn new(config: CacheConfig) -> PricingResult<Self> {
        if config.enabled && !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir)?;
        }

        Ok(Self { config })
    }

    fn cache_key(&self, symbol: &str, range: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}_{}_history.json", symbol.to_ascii_uppercase(), range))
    }

    /// Check if cache is valid (exists and not expired)
    pub fn is_valid(&self, symbol: &str, range: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let path = self.cache_key(symbol, range);
        if !path.exists() {
            return false;
        }

        if let Ok(metadata) = fs::metadata(&path) {
            if let Ok(modified) = metadata.modified() {
                let modified: DateTime<Utc> = modified.into();
                let age = Utc::now() - modified;
                return age < Duration::hours(self.config.max_age_hours);
            }
        }

        false
    }

    pub fn save_history(&self, range: &str, history: &PriceHistory) -> PricingResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let path = self.cache_key(&history.symbol, range);
        let json = serde_json::to_string_pretty(history)?;
        fs::write(&path, json)?;

        tracing::info!("Cached {} history for {} at {:?}", range, history.symbol, path);
        Ok(())
    }

    pub fn load_history(&self, symbol: &str, range: &str) -> PricingResult<Option<PriceHistory>> {
        if !self.is_valid(symbol, range) {
            return Ok(None);
        }

        let path = self.cache_key(symbol, range);
        let json = fs::read_to_string(&path)?;
        let history: PriceHistory = serde_json::from_str(&json)?;

        tracing::info!("Loaded {} history for {} from cache", range, symbol);
        Ok(Some(history))
    }

    /// Clear cache for a symbol
    pub fn clear(&self, symbol: &str) -> PricingResult<()> {
        if !self.config.cache_dir.exists() {
            return Ok(());
        }

        let symbol = symbol.to_ascii_uppercase();
        for entry in fs::read_dir(&self.config.cache_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();

            // Exact symbol match: "BRK" must not take "BRK_B" with it
            let cached_symbol = file_name
                .strip_suffix("_history.json")
                .and_then(|stem| stem.rsplit_once('_'))
                .map(|(s, _range)| s);
            if cached_symbol == Some(symbol.as_str()) {
                fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }

    /// Clear all cache
    pub fn clear_all(&self) -> PricingResult<()> {
        if self.config.cache_dir.exists() {
            fs::remove_dir_all(&self.config.cache_dir)?;
            fs::create_dir_all(&self.config.cache_dir)?;
        }
        Ok(())
    }

    /// List cached symbols
    pub fn list_cached(&self) -> PricingResult<Vec<String>> {
        let mut symbols = Vec::new();

        if !self.config.cache_dir.exists() {
            return Ok(symbols);
        }

        for entry in fs::read_dir(&self.config.cache_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();

            if let Some(stem) = file_name.strip_suffix("_history.json") {
                // stem is SYMBOL_RANGE; symbols may themselves contain '_'
                if let Some((symbol, _range)) = stem.rsplit_once('_') {
                    if !symbols.iter().any(|s| s == symbol) {
                        symbols.push(symbol.to_string());
                    }
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// Market data provider backed by the cache, falling back to Yahoo Finance
pub struct CachedProvider {
    cache: DataCache,
    client: YahooClient,
    range: String,
}

impl CachedProvider {
    pub fn new(config: CacheConfig) -> PricingResult<Self> {
        Ok(Self {
            cache: DataCache::new(config)?,
            client: YahooClient::new()?,
            range: DEFAULT_RANGE.to_string(),
        })
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    /// Get price history (from cache or fetch)
    pub fn get_history(&self, symbol: &str) -> PricingResult<PriceHistory> {
        if let Some(history) = self.cache.load_history(symbol, &self.range)? {
            return Ok(history);
        }

        tracing::info!("Fetching fresh data for {}", symbol);
        let history = self.client.get_price_history(symbol, &self.range)?;
        self.cache.save_history(&self.range, &history)?;

        Ok(history)
    }

    /// Force refresh (bypass cache)
    pub fn refresh_history(&self, symbol: &str) -> PricingResult<PriceHistory> {
        self.cache.clear(symbol)?;
        self.get_history(symbol)
    }
}

impl MarketDataProvider for CachedProvider {
    fn market_parameters(&self, symbol: &str) -> PricingResult<MarketParameters> {
        self.get_history(symbol)?.market_parameters()
    }
}
