//! Additive noise sources for the channel.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Distribution, Normal};

use crate::channel::Sample;
use crate::error::{CdmaError, Result};

/// Produces a perturbation sequence of a requested length.
pub trait NoiseSource {
    fn generate(&mut self, len: usize) -> Vec<Sample>;
}

/// Gaussian noise N(mean, std_dev^2).
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    distribution: Normal<f64>,
    rng: ChaCha12Rng,
}

impl GaussianNoise {
    /// Reproducible noise from a seed.
    pub fn new_from_seed(mean: f64, std_dev: f64, seed: u64) -> Result<Self> {
        Ok(Self {
            distribution: Self::distribution(mean, std_dev)?,
            rng: ChaCha12Rng::seed_from_u64(seed),
        })
    }

    /// Noise seeded from system entropy (non-reproducible).
    pub fn new_from_entropy(mean: f64, std_dev: f64) -> Result<Self> {
        Ok(Self {
            distribution: Self::distribution(mean, std_dev)?,
            rng: ChaCha12Rng::from_entropy(),
        })
    }

    pub fn mean(&self) -> f64 {
        self.distribution.mean()
    }

    pub fn std_dev(&self) -> f64 {
        self.distribution.std_dev()
    }

    fn distribution(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
        if !mean.is_finite() {
            return Err(CdmaError::InvalidInput(format!("noise mean {} is not finite", mean)));
        }
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(CdmaError::InvalidInput(format!(
                "noise standard deviation {} must be finite and >= 0",
                std_dev
            )));
        }
        Normal::new(mean, std_dev).map_err(|e| CdmaError::InvalidInput(e.to_string()))
    }
}

impl NoiseSource for GaussianNoise {
    fn generate(&mut self, len: usize) -> Vec<Sample> {
        (0..len).map(|_| self.distribution.sample(&mut self.rng)).collect()
    }
}
