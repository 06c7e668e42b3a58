//! Byte reassembly gated by correlation confidence.
//!
//! Eight soft bits make one byte. The byte's confidence is the sum of the
//! squared correlations; a byte at or below the threshold is dropped. Drops
//! are reported by [`assemble`] and skipped by [`get_bytes`], so the decoded
//! stream can be shorter than what was sent.

use crate::bits::{from_bin, BITS_PER_BYTE};
use crate::channel::Sample;
use crate::decider::SoftBit;
use crate::frame::frames;

/// Default confidence threshold.
pub const DEFAULT_THRESHOLD: Sample = 10.0;

/// Result of assembling one 8-bit window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ByteOutcome {
    Accepted {
        index: usize,
        byte: u8,
        confidence: Sample,
    },
    /// Confidence was not above the threshold
    Dropped {
        index: usize,
        byte: u8,
        confidence: Sample,
    },
}

impl ByteOutcome {
    /// The byte, if it was accepted.
    pub fn byte(&self) -> Option<u8> {
        match self {
            ByteOutcome::Accepted { byte, .. } => Some(*byte),
            ByteOutcome::Dropped { .. } => None,
        }
    }

    /// The byte the bits spelled out, accepted or not.
    pub fn raw_byte(&self) -> u8 {
        match self {
            ByteOutcome::Accepted { byte, .. } | ByteOutcome::Dropped { byte, .. } => *byte,
        }
    }

    /// Window position in the bit stream.
    pub fn index(&self) -> usize {
        match self {
            ByteOutcome::Accepted { index, .. } | ByteOutcome::Dropped { index, .. } => *index,
        }
    }

    pub fn confidence(&self) -> Sample {
        match self {
            ByteOutcome::Accepted { confidence, .. } | ByteOutcome::Dropped { confidence, .. } => {
                *confidence
            }
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, ByteOutcome::Dropped { .. })
    }
}

/// Sum of squared correlations over one byte.
pub fn byte_confidence(window: &[SoftBit; BITS_PER_BYTE]) -> Sample {
    window.iter().map(|soft| soft.correlation * soft.correlation).sum()
}

/// Judge every complete window of 8 soft bits against `threshold`.
///
/// The first bit of a window is the most significant bit of the byte.
/// A trailing partial window produces nothing.
pub fn assemble<I>(pairs: I, threshold: Sample) -> impl Iterator<Item = ByteOutcome>
where
    I: IntoIterator,
    I::Item: Into<SoftBit>,
{
    frames(pairs.into_iter().map(Into::<SoftBit>::into))
        .enumerate()
        .map(move |(index, window)| {
            let confidence = byte_confidence(&window);
            let byte = from_bin(&window.map(|soft| soft.bit));
            if confidence > threshold {
                ByteOutcome::Accepted {
                    index,
                    byte,
                    confidence,
                }
            } else {
                ByteOutcome::Dropped {
                    index,
                    byte,
                    confidence,
                }
            }
        })
}

/// Accepted bytes only; low-confidence windows are skipped.
pub fn get_bytes<I>(pairs: I, threshold: Sample) -> impl Iterator<Item = u8>
where
    I: IntoIterator,
    I::Item: Into<SoftBit>,
{
    assemble(pairs, threshold).filter_map(|outcome| outcome.byte())
}
