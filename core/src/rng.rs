//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulator may call any platform RNG.
//! All randomness flows through one CampaignRng, seeded once per run
//! and passed explicitly to whatever consumes it.
//!
//! Draw order is part of the output format: the same seed and the same
//! sequence of calls always yield the same values.

use crate::error::{SimError, SimResult};
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution, Poisson};
use rand_pcg::Pcg64Mcg;

/// A deterministic random source for a single run.
pub struct CampaignRng {
    seed: u64,
    inner: Pcg64Mcg,
}

impl CampaignRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample a Poisson count with the given mean.
    pub fn poisson(&mut self, mean: f64) -> SimResult<u64> {
        let dist = Poisson::new(mean)
            .map_err(|e| SimError::Distribution(format!("poisson(mean={mean}): {e}")))?;
        let draw: f64 = dist.sample(&mut self.inner);
        Ok(draw as u64)
    }

    /// Number of successes in `trials` Bernoulli trials with probability `p`.
    pub fn binomial(&mut self, trials: u64, p: f64) -> SimResult<u64> {
        let dist = Binomial::new(trials, p)
            .map_err(|e| SimError::Distribution(format!("binomial(n={trials}, p={p}): {e}")))?;
        Ok(dist.sample(&mut self.inner))
    }

    /// Uniform float in [low, high). A degenerate range returns `low`
    /// without consuming a draw.
    pub fn uniform(&mut self, low: f64, high: f64) -> SimResult<f64> {
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(SimError::Distribution(format!("uniform({low}, {high})")));
        }
        if low == high {
            return Ok(low);
        }
        Ok(self.inner.gen_range(low..high))
    }
}
