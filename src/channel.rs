//! Shared-medium channel: elementwise superposition of equally long sequences.
//!
//! Mixing is used twice in a run, once to superpose the users' chip streams
//! and once to add a noise sequence on top of that composite. Unequal lengths
//! are an error; nothing is padded or truncated.

use std::ops::Deref;
use std::sync::Arc;

use tracing::debug;

use crate::error::{CdmaError, Result};

/// A composite channel sample, integer-valued until noise is added.
pub type Sample = f64;

/// Lazy elementwise sum over several sources.
///
/// Yields `Err(LengthMismatch)` once, at the first position where some but
/// not all sources have ended, and then stops.
#[derive(Debug)]
pub struct Mix<I> {
    sources: Vec<I>,
    position: usize,
    done: bool,
}

impl<I> Iterator for Mix<I>
where
    I: Iterator,
    I::Item: Into<Sample>,
{
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.sources.is_empty() {
            return None;
        }

        let mut sum = 0.0;
        let mut ended = None;
        let mut live = false;
        for (index, source) in self.sources.iter_mut().enumerate() {
            match source.next() {
                Some(value) => {
                    sum += value.into();
                    live = true;
                }
                None => {
                    ended.get_or_insert(index);
                }
            }
        }

        match ended {
            None => {
                self.position += 1;
                Some(Ok(sum))
            }
            Some(source_index) => {
                self.done = true;
                if live {
                    Some(Err(CdmaError::LengthMismatch {
                        position: self.position,
                        source_index,
                    }))
                } else {
                    None
                }
            }
        }
    }
}

/// Superpose `sources` sample by sample.
pub fn mix<S>(sources: impl IntoIterator<Item = S>) -> Mix<S::IntoIter>
where
    S: IntoIterator,
    S::Item: Into<Sample>,
{
    Mix {
        sources: sources.into_iter().map(IntoIterator::into_iter).collect(),
        position: 0,
        done: false,
    }
}

/// A fully materialized composite signal.
///
/// Cloning shares the same immutable buffer, so several receivers can read
/// it at once, each with its own cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Arc<[Sample]>,
}

impl Signal {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Mix `sources` and buffer the result, failing on any length mismatch.
    pub fn superpose<S>(sources: impl IntoIterator<Item = S>) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: Into<Sample>,
    {
        let samples = mix(sources).collect::<Result<Vec<Sample>>>()?;
        debug!(samples = samples.len(), "superposed channel signal");
        Ok(Self::from_samples(samples))
    }

    /// Return a new signal with `noise` added; the lengths must match.
    pub fn add_noise(&self, noise: &[Sample]) -> Result<Self> {
        if noise.len() != self.len() {
            return Err(CdmaError::NoiseLengthMismatch {
                expected: self.len(),
                actual: noise.len(),
            });
        }
        Self::superpose([self.samples.iter().copied(), noise.iter().copied()])
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// A fresh read cursor over the buffered samples.
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.samples.iter().copied()
    }
}

impl Deref for Signal {
    type Target = [Sample];

    fn deref(&self) -> &[Sample] {
        &self.samples
    }
}

impl From<Vec<Sample>> for Signal {
    fn from(samples: Vec<Sample>) -> Self {
        Self::from_samples(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_sums_elementwise() {
        let out: Vec<Sample> = mix(vec![vec![1, -1, 1], vec![1, 1, -1], vec![-1, -1, -1]])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(out, vec![1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_mix_integer_and_real() {
        let chips: Vec<Sample> = vec![1.0, -2.0];
        let noise = vec![0.25, -0.5];
        let out: Vec<Sample> = mix([chips, noise]).collect::<Result<_>>().unwrap();
        assert_eq!(out, vec![1.25, -2.5]);
    }

    #[test]
    fn test_mix_length_mismatch() {
        let mut it = mix(vec![vec![1, 1, 1], vec![1, 1]]);
        assert_eq!(it.next().unwrap().unwrap(), 2.0);
        assert_eq!(it.next().unwrap().unwrap(), 2.0);
        match it.next() {
            Some(Err(CdmaError::LengthMismatch { position, source_index })) => {
                assert_eq!(position, 2);
                assert_eq!(source_index, 1);
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn test_mix_empty() {
        assert_eq!(mix(Vec::<Vec<i32>>::new()).count(), 0);
        assert_eq!(mix(vec![Vec::<i32>::new(), Vec::new()]).count(), 0);
    }

    #[test]
    fn test_superpose_fails_fast() {
        let err = Signal::superpose(vec![vec![1, 1], vec![1]]).unwrap_err();
        assert!(err.is_length_mismatch());
    }

    #[test]
    fn test_add_noise() {
        let signal = Signal::superpose(vec![vec![1, -1], vec![1, 1]]).unwrap();
        let noisy = signal.add_noise(&[0.5, -0.5]).unwrap();
        assert_eq!(noisy.samples(), &[2.5, -0.5]);
        // original untouched
        assert_eq!(signal.samples(), &[2.0, 0.0]);
    }

    #[test]
    fn test_add_noise_length_checked() {
        let signal = Signal::from_samples(vec![0.0; 16]);
        assert!(matches!(
            signal.add_noise(&[0.0; 15]),
            Err(CdmaError::NoiseLengthMismatch { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_clones_share_buffer() {
        let a = Signal::from_samples(vec![1.0, 2.0, 3.0]);
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.samples, &b.samples));
        assert_eq!(a.iter().sum::<Sample>(), 6.0);
        assert_eq!(b.len(), 3);
    }
}
