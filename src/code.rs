//! Spreading codes.
//!
//! A code is one byte whose 8 bits form the chip pattern of a single user.
//! The same code must be used by the spreader and the correlator of that user.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use crate::bits::{to_bin, Bit, BITS_PER_BYTE};
use crate::error::{CdmaError, Result};

/// An 8-chip spreading code identifying one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpreadingCode(u8);

impl SpreadingCode {
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Derive a code from a key using ChaCha12.
    ///
    /// The key is zero-padded or truncated to 32 bytes. An all-zero pattern
    /// is never returned since it cannot carry data.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut key = [0u8; 32];
        for (i, &b) in seed.iter().take(32).enumerate() {
            key[i] = b;
        }

        let mut rng = ChaCha12Rng::from_seed(key);
        loop {
            let code = (0..BITS_PER_BYTE).fold(0u8, |acc, _| (acc << 1) | rng.gen_bool(0.5) as u8);
            if code != 0 {
                return Self(code);
            }
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Code bits, MSB first. These are the 0/1 coefficients used by the correlator.
    pub fn bits(&self) -> [Bit; BITS_PER_BYTE] {
        to_bin(self.0)
    }

    /// Chip polarities: 1 maps to +1, 0 maps to -1.
    pub fn polarities(&self) -> [i32; BITS_PER_BYTE] {
        self.bits().map(|bit| if bit == 1 { 1 } else { -1 })
    }

    /// Number of 1 bits in the code.
    pub fn weight(&self) -> u32 {
        self.0.count_ones()
    }

    /// Confidence of every byte of a clean single-user signal spread with this code.
    ///
    /// Each bit correlates to exactly +/- weight, so a byte sums to 8 * weight^2.
    pub fn noiseless_confidence(&self) -> f64 {
        let w = self.weight() as f64;
        BITS_PER_BYTE as f64 * w * w
    }

    /// Dot product of the two bipolar chip patterns, in -8..=8.
    pub fn cross_correlation(&self, other: &SpreadingCode) -> i32 {
        self.polarities()
            .iter()
            .zip(other.polarities().iter())
            .map(|(a, b)| a * b)
            .sum()
    }
}

impl From<u8> for SpreadingCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for SpreadingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b{:08b}", self.0)
    }
}

impl FromStr for SpreadingCode {
    type Err = CdmaError;

    /// Accepts `0b` binary, `0x` hex or plain decimal.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parsed = if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
            u64::from_str_radix(&bin.replace('_', ""), 2)
        } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(&hex.replace('_', ""), 16)
        } else {
            s.parse::<u64>()
        };

        let value = parsed
            .map_err(|e| CdmaError::InvalidInput(format!("bad spreading code '{}': {}", s, e)))?;
        u8::try_from(value)
            .map(Self)
            .map_err(|_| CdmaError::InvalidInput(format!("spreading code {} does not fit in 8 bits", value)))
    }
}
