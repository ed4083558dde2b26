//! Convergence of the Monte Carlo estimator in the sample count
//!
//! Each sample size is priced from its own fresh draw rather than from a
//! prefix of one large sample. The resulting curve shows raw Monte Carlo
//! noise: its spread shrinks like 1/√N but it does not smooth out
//! monotonically.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::engine::{price_option, validate_inputs};
use super::estimator::PriceEstimate;
use crate::core::{PricingError, PricingParameters, PricingResult};
use crate::models::sampler::stream_rng;

/// One (N, estimate) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub sample_size: usize,
    pub estimate: PriceEstimate,
}

/// Estimates over a list of sample sizes, in the order requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceTrace {
    pub points: Vec<ConvergencePoint>,
}

impl ConvergenceTrace {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn sample_sizes(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.sample_size).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.estimate.value).collect()
    }

    /// Estimate at the last requested size
    pub fn final_estimate(&self) -> Option<&PriceEstimate> {
        self.points.last().map(|p| &p.estimate)
    }

    /// Signed error of each estimate against a reference value
    pub fn errors_against(&self, reference: f64) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p.estimate.value - reference)
            .collect()
    }

    /// Largest absolute error against a reference value
    pub fn max_abs_error(&self, reference: f64) -> f64 {
        self.errors_against(reference)
            .into_iter()
            .fold(0.0, |acc, e| acc.max(e.abs()))
    }
}

fn validate_sizes(params: &PricingParameters, sample_sizes: &[usize]) -> PricingResult<()> {
    if sample_sizes.is_empty() {
        return Err(PricingError::invalid_argument(
            "sample size list must not be empty",
        ));
    }
    for &n in sample_sizes {
        validate_inputs(params, n)?;
    }
    Ok(())
}

/// Price at each sample size with fresh draws from `rng`.
///
/// The whole list is validated before anything is sampled.
pub fn analyze_convergence<R: Rng + ?Sized>(
    params: &PricingParameters,
    sample_sizes: &[usize],
    rng: &mut R,
) -> PricingResult<ConvergenceTrace> {
    validate_sizes(params, sample_sizes)?;

    let mut points = Vec::with_capacity(sample_sizes.len());
    for &n in sample_sizes {
        let run = price_option(params, n, rng)?;
        tracing::debug!(sample_size = n, price = run.price(), "convergence step");
        points.push(ConvergencePoint {
            sample_size: n,
            estimate: run.estimate,
        });
    }

    Ok(ConvergenceTrace { points })
}

/// Price all sample sizes concurrently.
///
/// Size `i` draws from ChaCha stream `i` of `seed`, so the result is
/// reproducible and each point stays attached to its requested size.
pub fn analyze_convergence_parallel(
    params: &PricingParameters,
    sample_sizes: &[usize],
    seed: u64,
) -> PricingResult<ConvergenceTrace> {
    validate_sizes(params, sample_sizes)?;

    let points = sample_sizes
        .par_iter()
        .enumerate()
        .map(|(idx, &n)| {
            let mut rng = stream_rng(seed, idx as u64);
            price_option(params, n, &mut rng).map(|run| ConvergencePoint {
                sample_size: n,
                estimate: run.estimate,
            })
        })
        .collect::<PricingResult<Vec<_>>>()?;

    Ok(ConvergenceTrace { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_SAMPLE_SIZES;
    use crate::models::black_scholes;
    use crate::models::sampler::seeded_rng;

    fn scenario() -> PricingParameters {
        PricingParameters::call(185.40, 185.00, 0.25, 0.045, 0.283).unwrap()
    }

    #[test]
    fn test_convergence_scenario() {
        let params = scenario();
        let mut rng = seeded_rng(Some(42));
        let trace = analyze_convergence(&params, &DEFAULT_SAMPLE_SIZES, &mut rng).unwrap();

        assert_eq!(trace.len(), 8);
        assert_eq!(trace.sample_sizes(), DEFAULT_SAMPLE_SIZES.to_vec());

        // Standard error ∝ 1/√N: 500x more samples, ~22x smaller error
        let first = trace.points[0].estimate.standard_error;
        let last = trace.points[7].estimate.standard_error;
        let ratio = first / last;
        assert!(ratio > 15.0 && ratio < 30.0, "ratio {}", ratio);

        let exact = black_scholes::price_params(&params);
        let final_est = trace.final_estimate().unwrap();
        assert!((final_est.value - exact).abs() < 0.4);
        assert!(trace.max_abs_error(exact) < 8.0);
    }

    #[test]
    fn test_order_preserved_no_dedup() {
        let sizes = [5000, 100, 100, 2000];
        let mut rng = seeded_rng(Some(1));
        let trace = analyze_convergence(&scenario(), &sizes, &mut rng).unwrap();

        assert_eq!(trace.sample_sizes(), vec![5000, 100, 100, 2000]);
        for (p, &n) in trace.points.iter().zip(&sizes) {
            assert_eq!(p.estimate.sample_size, n);
        }
        // Repeated size gets its own independent draw
        assert_ne!(trace.points[1].estimate.value, trace.points[2].estimate.value);
    }

    #[test]
    fn test_invalid_sizes() {
        let mut rng = seeded_rng(Some(1));
        assert!(analyze_convergence(&scenario(), &[], &mut rng)
            .unwrap_err()
            .is_invalid_argument());
        assert!(analyze_convergence(&scenario(), &[100, 0], &mut rng).is_err());
        assert!(analyze_convergence_parallel(&scenario(), &[], 1).is_err());

        let bad = PricingParameters {
            spot: 0.0,
            ..scenario()
        };
        assert!(analyze_convergence(&bad, &[100], &mut rng).is_err());
    }

    #[test]
    fn test_parallel_matches_request_order() {
        let sizes = [50_000, 100, 10_000, 500];
        let a = analyze_convergence_parallel(&scenario(), &sizes, 42).unwrap();
        let b = analyze_convergence_parallel(&scenario(), &sizes, 42).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.sample_sizes(), sizes.to_vec());
        for p in &a.points {
            assert_eq!(p.estimate.sample_size, p.sample_size);
        }
    }

    #[test]
    fn test_parallel_point_equals_sequential_on_same_stream() {
        let sizes = [1000, 2000];
        let trace = analyze_convergence_parallel(&scenario(), &sizes, 9).unwrap();

        let mut rng = stream_rng(9, 1);
        let run = price_option(&scenario(), 2000, &mut rng).unwrap();
        assert_eq!(trace.points[1].estimate, run.estimate);
    }
}
