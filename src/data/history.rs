//! Daily close history and the volatility estimate derived from it

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::provider::MarketParameters;
use crate::core::{PricingError, PricingResult};

/// Trading days per year used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// One daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing prices for a symbol, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub bars: Vec<DailyClose>,
    /// When the series was fetched
    pub timestamp: DateTime<Utc>,
}

impl PriceHistory {
    pub fn new(symbol: impl Into<String>, mut bars: Vec<DailyClose>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
            timestamp: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Last close in the series
    pub fn spot(&self) -> PricingResult<f64> {
        self.bars.last().map(|b| b.close).ok_or_else(|| {
            PricingError::data_unavailable(format!("no price history for {}", self.symbol))
        })
    }

    /// ln(C_t / C_{t-1}) for consecutive closes
    pub fn log_returns(&self) -> Vec<f64> {
        self.bars
            .windows(2)
            .map(|w| (w[1].close / w[0].close).ln())
            .collect()
    }

    /// Sample standard deviation of daily log returns
    pub fn daily_volatility(&self) -> PricingResult<f64> {
        let returns = self.log_returns();
        if returns.len() < 2 {
            return Err(PricingError::data_unavailable(format!(
                "need at least 3 closes to estimate volatility for {}, have {}",
                self.symbol,
                self.bars.len()
            )));
        }
        Ok(returns.iter().std_dev())
    }

    /// Daily volatility scaled by √252
    pub fn annualized_volatility(&self) -> PricingResult<f64> {
        Ok(self.daily_volatility()? * TRADING_DAYS_PER_YEAR.sqrt())
    }

    /// Spot and annualized volatility for the pricing engine
    pub fn market_parameters(&self) -> PricingResult<MarketParameters> {
        Ok(MarketParameters {
            symbol: self.symbol.clone(),
            spot_price: self.spot()?,
            annualized_volatility: self.annualized_volatility()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn history(closes: &[f64]) -> PriceHistory {
        let start = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyClose {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        PriceHistory::new("TEST", bars)
    }

    #[test]
    fn test_log_returns() {
        let h = history(&[100.0, 110.0, 99.0]);
        let r = h.log_returns();

        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], (1.1_f64).ln(), epsilon = 1e-12);
        assert_relative_eq!(r[1], (0.9_f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_annualized_volatility() {
        let h = history(&[100.0, 101.0, 99.5, 102.0, 101.2, 103.4]);
        let r = h.log_returns();

        let mean = r.iter().sum::<f64>() / r.len() as f64;
        let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (r.len() - 1) as f64;
        let expected = var.sqrt() * 252.0_f64.sqrt();

        assert_relative_eq!(h.annualized_volatility().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_prices_zero_vol() {
        let h = history(&[50.0, 50.0, 50.0, 50.0]);
        assert_eq!(h.annualized_volatility().unwrap(), 0.0);
    }

    #[test]
    fn test_spot_is_last_close() {
        // Out of order input is sorted by date
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let h = PriceHistory::new(
            "TEST",
            vec![
                DailyClose { date: d(5), close: 12.0 },
                DailyClose { date: d(3), close: 10.0 },
                DailyClose { date: d(4), close: 11.0 },
            ],
        );
        assert_eq!(h.spot().unwrap(), 12.0);

        let params = h.market_parameters().unwrap();
        assert_eq!(params.symbol, "TEST");
        assert_eq!(params.spot_price, 12.0);
        assert!(params.annualized_volatility > 0.0);
    }

    #[test]
    fn test_insufficient_history() {
        let empty = history(&[]);
        assert!(matches!(empty.spot(), Err(PricingError::DataUnavailable(_))));
        assert!(matches!(
            history(&[100.0, 101.0]).annualized_volatility(),
            Err(PricingError::DataUnavailable(_))
        ));
    }
}
