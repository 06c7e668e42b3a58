//! Hard bit decision that keeps the soft correlation alongside.

use crate::bits::Bit;
use crate::channel::Sample;

/// A decided bit and the correlation it was decided from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftBit {
    pub bit: Bit,
    pub correlation: Sample,
}

impl SoftBit {
    /// Positive correlation decodes to 1, anything else to 0.
    pub fn decide(correlation: Sample) -> Self {
        let bit = if correlation > 0.0 { 1 } else { 0 };
        Self { bit, correlation }
    }
}

impl From<(Bit, Sample)> for SoftBit {
    fn from((bit, correlation): (Bit, Sample)) -> Self {
        Self { bit, correlation }
    }
}

impl From<SoftBit> for (Bit, Sample) {
    fn from(soft: SoftBit) -> Self {
        (soft.bit, soft.correlation)
    }
}

/// Decide each correlation value, one to one.
pub fn get_bits<I>(correlations: I) -> impl Iterator<Item = SoftBit>
where
    I: IntoIterator<Item = Sample>,
{
    correlations.into_iter().map(SoftBit::decide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_decision() {
        let out: Vec<(Bit, Sample)> = get_bits(vec![5.0, -3.0, 0.0, 0.1, -0.0])
            .map(Into::into)
            .collect();
        assert_eq!(out, vec![(1, 5.0), (0, -3.0), (0, 0.0), (1, 0.1), (0, -0.0)]);
    }

    #[test]
    fn test_correlation_forwarded_unchanged() {
        let soft = SoftBit::decide(-7.25);
        assert_eq!(soft.correlation, -7.25);
        assert_eq!(soft.bit, 0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(get_bits(Vec::new()).count(), 0);
    }
}
