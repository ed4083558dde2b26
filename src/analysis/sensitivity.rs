//! Price sensitivity to volatility and strike
//!
//! Sweeps re-run the Monte Carlo engine once per input value. The free
//! functions take fresh draws from the supplied generator at each point;
//! the [`MonteCarloEngine`] methods follow the engine's seed and
//! parallel settings.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{PricingError, PricingParameters, PricingResult};
use crate::pricing::engine::{price_option, validate_inputs, MonteCarloEngine, PricingRun};
use crate::pricing::estimator::PriceEstimate;

/// Price at one value of the swept input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub input: f64,
    pub estimate: PriceEstimate,
}

/// Ordered sweep result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySweep {
    /// Name of the swept input ("volatility", "strike")
    pub parameter: String,
    pub points: Vec<SensitivityPoint>,
}

impl SensitivitySweep {
    pub fn inputs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.input).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.estimate.value).collect()
    }

    /// Percentage change in price from the first to the last point
    pub fn price_change_pct(&self) -> Option<f64> {
        let first = self.points.first()?.estimate.value;
        let last = self.points.last()?.estimate.value;
        if first == 0.0 {
            return None;
        }
        Some((last / first - 1.0) * 100.0)
    }
}

fn sweep<A, P>(
    parameter: &str,
    base: &PricingParameters,
    inputs: &[f64],
    num_sims: usize,
    apply: A,
    mut price: P,
) -> PricingResult<SensitivitySweep>
where
    A: Fn(&PricingParameters, f64) -> PricingParameters,
    P: FnMut(&PricingParameters) -> PricingResult<PricingRun>,
{
    if inputs.is_empty() {
        return Err(PricingError::invalid_argument(format!(
            "{} sweep needs at least one value",
            parameter
        )));
    }

    // Validate every point before sampling anything
    let scenarios: Vec<PricingParameters> = inputs.iter().map(|&x| apply(base, x)).collect();
    for scenario in &scenarios {
        validate_inputs(scenario, num_sims)?;
    }

    let mut points = Vec::with_capacity(inputs.len());
    for (&input, scenario) in inputs.iter().zip(&scenarios) {
        let run = price(scenario)?;
        tracing::debug!(parameter, input, price = run.price(), "sensitivity point");
        points.push(SensitivityPoint {
            input,
            estimate: run.estimate,
        });
    }

    Ok(SensitivitySweep {
        parameter: parameter.to_string(),
        points,
    })
}

fn with_volatility(p: &PricingParameters, v: f64) -> PricingParameters {
    p.with_volatility(v)
}

fn with_strike(p: &PricingParameters, k: f64) -> PricingParameters {
    p.with_strike(k)
}

/// Price across volatilities, everything else held at `base`.
///
/// Each point takes fresh draws from `rng`.
pub fn volatility_sweep<R: Rng + ?Sized>(
    base: &PricingParameters,
    volatilities: &[f64],
    num_sims: usize,
    rng: &mut R,
) -> PricingResult<SensitivitySweep> {
    sweep("volatility", base, volatilities, num_sims, with_volatility, |p| {
        price_option(p, num_sims, &mut *rng)
    })
}

/// Price across strikes, everything else held at `base`
pub fn strike_sweep<R: Rng + ?Sized>(
    base: &PricingParameters,
    strikes: &[f64],
    num_sims: usize,
    rng: &mut R,
) -> PricingResult<SensitivitySweep> {
    sweep("strike", base, strikes, num_sims, with_strike, |p| {
        price_option(p, num_sims, &mut *rng)
    })
}

impl MonteCarloEngine {
    /// Volatility sweep on this engine's configuration.
    ///
    /// A seeded engine restarts from its seed at every point, so the points
    /// share their normal draws.
    pub fn volatility_sweep(
        &self,
        base: &PricingParameters,
        volatilities: &[f64],
        num_sims: usize,
    ) -> PricingResult<SensitivitySweep> {
        sweep("volatility", base, volatilities, num_sims, with_volatility, |p| {
            self.price(p, num_sims)
        })
    }

    /// Strike sweep on this engine's configuration
    pub fn strike_sweep(
        &self,
        base: &PricingParameters,
        strikes: &[f64],
        num_sims: usize,
    ) -> PricingResult<SensitivitySweep> {
        sweep("strike", base, strikes, num_sims, with_strike, |p| {
            self.price(p, num_sims)
        })
    }
}
