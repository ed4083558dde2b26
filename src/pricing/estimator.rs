//! Discounted mean payoff and its standard error

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::core::{PricingError, PricingResult};

/// Monte Carlo price estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    /// exp(-rT) * mean(payoffs)
    pub value: f64,
    /// Number of payoffs averaged
    pub sample_size: usize,
    /// exp(-rT) * sample std(payoffs) / sqrt(N). NaN for a single sample.
    pub standard_error: f64,
}

impl PriceEstimate {
    /// Symmetric interval value ± z * standard_error
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        let half_width = z * self.standard_error;
        (self.value - half_width, self.value + half_width)
    }

    /// Is `target` within z standard errors of the estimate?
    pub fn is_consistent_with(&self, target: f64, z: f64) -> bool {
        let (lo, hi) = self.confidence_interval(z);
        lo <= target && target <= hi
    }
}

fn check_non_empty(payoffs: &[f64]) -> PricingResult<()> {
    if payoffs.is_empty() {
        return Err(PricingError::invalid_argument(
            "cannot estimate a price from an empty payoff sample",
        ));
    }
    Ok(())
}

/// exp(-rT) * mean(payoffs)
pub fn estimate_price(payoffs: &[f64], rate: f64, maturity: f64) -> PricingResult<f64> {
    check_non_empty(payoffs)?;
    let discount = (-rate * maturity).exp();
    Ok(discount * payoffs.iter().mean())
}

/// Price plus standard error
pub fn estimate(payoffs: &[f64], rate: f64, maturity: f64) -> PricingResult<PriceEstimate> {
    let value = estimate_price(payoffs, rate, maturity)?;
    let n = payoffs.len();

    let standard_error = if n > 1 {
        let discount = (-rate * maturity).exp();
        discount * payoffs.iter().std_dev() / (n as f64).sqrt()
    } else {
        f64::NAN
    };

    Ok(PriceEstimate {
        value,
        sample_size: n,
        standard_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discounted_mean() {
        let payoffs = [0.0, 10.0, 20.0];
        let p = estimate_price(&payoffs, 0.05, 1.0).unwrap();
        assert_relative_eq!(p, 10.0 * (-0.05_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_and_negative_rate() {
        let payoffs = [4.0, 6.0];
        assert_relative_eq!(estimate_price(&payoffs, 0.0, 2.0).unwrap(), 5.0, epsilon = 1e-12);
        assert!(estimate_price(&payoffs, -0.01, 1.0).unwrap() > 5.0);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(estimate_price(&[], 0.05, 1.0).unwrap_err().is_invalid_argument());
        assert!(estimate(&[], 0.05, 1.0).is_err());
    }

    #[test]
    fn test_standard_error() {
        let payoffs = [1.0, 2.0, 3.0, 4.0];
        let est = estimate(&payoffs, 0.0, 1.0).unwrap();

        // sample std of 1..4 = sqrt(5/3)
        let expected = (5.0_f64 / 3.0).sqrt() / 2.0;
        assert_relative_eq!(est.standard_error, expected, epsilon = 1e-12);
        assert_eq!(est.sample_size, 4);

        let (lo, hi) = est.confidence_interval(1.96);
        assert!(lo < est.value && est.value < hi);
        assert!(est.is_consistent_with(2.5, 1.0));
        assert!(!est.is_consistent_with(10.0, 3.0));
    }

    #[test]
    fn test_single_sample() {
        let est = estimate(&[7.0], 0.0, 1.0).unwrap();
        assert_eq!(est.value, 7.0);
        assert!(est.standard_error.is_nan());
    }
}
