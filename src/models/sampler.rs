//! Standard normal sampling
//!
//! All randomness flows through an explicit generator handle. There is no
//! process-wide seed: callers either pass their own `Rng` or a seed that is
//! turned into a ChaCha8 stream here.
//!
//! The parallel sampler splits the draw into fixed-size chunks, each fed by
//! its own ChaCha8 stream of the same seed. Chunks are independent, so the
//! joint distribution does not depend on where the boundaries fall; only
//! the exact values do.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;

use crate::core::{PricingError, PricingResult};

/// Generator used for all seeded simulation
pub type SimRng = ChaCha8Rng;

/// Build the simulation generator from an optional seed
pub fn seeded_rng(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Independent generator for sub-task `stream` of a seeded computation
pub fn stream_rng(seed: u64, stream: u64) -> SimRng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// An immutable batch of standard normal draws
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    draws: Vec<f64>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.draws
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.draws.iter()
    }
}

fn check_count(n: usize) -> PricingResult<()> {
    if n == 0 {
        return Err(PricingError::invalid_argument(
            "sample count must be positive",
        ));
    }
    Ok(())
}

/// Draw `n` standard normals from the given generator
pub fn sample_with<R: Rng + ?Sized>(n: usize, rng: &mut R) -> PricingResult<SampleSet> {
    check_count(n)?;
    let draws = (0..n)
        .map(|_| Distribution::<f64>::sample(&StandardNormal, rng))
        .collect();
    Ok(SampleSet { draws })
}

/// Draw `n` standard normals from a fresh generator built from `seed`
pub fn sample(n: usize, seed: Option<u64>) -> PricingResult<SampleSet> {
    let mut rng = seeded_rng(seed);
    sample_with(n, &mut rng)
}

/// Draw `n` standard normals in parallel chunks of `chunk_size`.
///
/// Reproducible for a fixed `(seed, chunk_size)`.
pub fn sample_parallel(n: usize, seed: u64, chunk_size: usize) -> PricingResult<SampleSet> {
    check_count(n)?;
    if chunk_size == 0 {
        return Err(PricingError::invalid_argument("chunk_size must be positive"));
    }

    let mut draws = vec![0.0; n];
    draws
        .par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let mut rng = stream_rng(seed, chunk_idx as u64);
            for z in chunk.iter_mut() {
                *z = Distribution::<f64>::sample(&StandardNormal, &mut rng);
            }
        });

    Ok(SampleSet { draws })
}
