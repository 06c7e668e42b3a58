//! Run parameters for a multi-user simulation.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::assembler::DEFAULT_THRESHOLD;
use crate::channel::Sample;
use crate::code::SpreadingCode;
use crate::error::{CdmaError, Result};
use crate::noise::{GaussianNoise, NoiseSource};
use crate::session::{receive_all, Reception, Session};
use crate::text::Codec;

/// One user's payload and spreading code.
#[derive(Debug, Clone, PartialEq)]
pub struct UserConfig {
    pub text: String,
    pub code: SpreadingCode,
}

impl UserConfig {
    pub fn new(text: impl Into<String>, code: u8) -> Self {
        Self {
            text: text.into(),
            code: SpreadingCode::new(code),
        }
    }
}

impl FromStr for UserConfig {
    type Err = CdmaError;

    /// `TEXT:CODE`, split at the last colon so the text may contain colons.
    fn from_str(s: &str) -> Result<Self> {
        let (text, code) = s
            .rsplit_once(':')
            .ok_or_else(|| CdmaError::InvalidInput(format!("expected TEXT:CODE, got '{}'", s)))?;
        Ok(Self {
            text: text.to_string(),
            code: code.parse()?,
        })
    }
}

/// Additive Gaussian noise on the composite.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseConfig {
    pub mean: f64,
    pub std_dev: f64,
    /// `None` draws the seed from system entropy
    pub seed: Option<u64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            mean: 0.0,
            std_dev: 0.3,
            seed: None,
        }
    }
}

impl NoiseConfig {
    pub fn silent() -> Self {
        Self {
            mean: 0.0,
            std_dev: 0.0,
            seed: Some(0),
        }
    }

    pub fn source(&self) -> Result<GaussianNoise> {
        match self.seed {
            Some(seed) => GaussianNoise::new_from_seed(self.mean, self.std_dev, seed),
            None => GaussianNoise::new_from_entropy(self.mean, self.std_dev),
        }
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub users: Vec<UserConfig>,
    pub threshold: Sample,
    pub noise: NoiseConfig,
    pub codec: Codec,
    /// Where to write the correlation plot, if anywhere
    pub plot: Option<PathBuf>,
    /// Index into `users` of the plotted user
    pub plot_user: usize,
}

impl Default for Config {
    /// Three users with low mutual correlation, threshold 10, noise N(0, 0.3^2).
    fn default() -> Self {
        Self {
            users: vec![
                UserConfig::new("Zenith   ", 0b0110_1110),
                UserConfig::new("Aerospace", 0b1010_1101),
                UserConfig::new("UUUUUUUUU", 0b1101_0001),
            ],
            threshold: DEFAULT_THRESHOLD,
            noise: NoiseConfig::default(),
            codec: Codec::Utf8,
            plot: None,
            plot_user: 0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.users.is_empty() {
            return Err(CdmaError::Config("at least one user is required".into()));
        }
        for (i, user) in self.users.iter().enumerate() {
            if user.code.value() == 0 {
                return Err(CdmaError::Config(format!(
                    "user {} has the all-zero code, which cannot carry data",
                    i
                )));
            }
        }
        if !self.threshold.is_finite() {
            return Err(CdmaError::Config(format!("threshold {} is not finite", self.threshold)));
        }
        if !self.noise.mean.is_finite() || !self.noise.std_dev.is_finite() || self.noise.std_dev < 0.0 {
            return Err(CdmaError::Config(format!(
                "noise mean {} / std {} must be finite with std >= 0",
                self.noise.mean, self.noise.std_dev
            )));
        }
        if self.plot.is_some() && self.plot_user >= self.users.len() {
            return Err(CdmaError::Config(format!(
                "plot user {} out of range (have {} users)",
                self.plot_user,
                self.users.len()
            )));
        }
        Ok(())
    }

    pub fn session(&self) -> Session<Codec> {
        self.users
            .iter()
            .fold(Session::with_codec(self.codec), |session, user| {
                session.user(user.text.clone(), user.code)
            })
    }

    /// Spread all users, superpose, add noise, then despread every user.
    pub fn run(&self) -> Result<Vec<Reception>> {
        self.validate()?;

        let session = self.session();
        let clean = session.transmit()?;
        info!(users = self.users.len(), samples = clean.len(), "channel composite built");

        let noise = self.noise.source()?.generate(clean.len());
        let composite = clean.add_noise(&noise)?;
        debug!(
            mean = self.noise.mean,
            std_dev = self.noise.std_dev,
            "noise added to composite"
        );

        Ok(receive_all(&composite, &session.receivers(self.threshold)))
    }
}
