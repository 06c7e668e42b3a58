//! Despreading correlator.
//!
//! The composite is cut into non-overlapping 8-sample windows, one per
//! transmitted bit, and each window is dotted with the user's code bits.
//! Code bits enter as 0/1 coefficients, so a clean single-user window
//! correlates to +/- the code weight.

use crate::bits::BITS_PER_BYTE;
use crate::channel::Sample;
use crate::code::SpreadingCode;
use crate::frame::frames;

/// Dot product of one 8-sample window with the code bits.
pub fn correlate_window(window: &[Sample; BITS_PER_BYTE], code: SpreadingCode) -> Sample {
    window
        .iter()
        .zip(code.bits())
        .map(|(&sample, bit)| sample * Sample::from(bit))
        .sum()
}

/// One correlation value per complete 8-sample window of `composite`.
///
/// A trailing window shorter than 8 samples produces nothing.
pub fn get_correlation<I>(composite: I, code: SpreadingCode) -> impl Iterator<Item = Sample>
where
    I: IntoIterator,
    I::Item: Into<Sample>,
{
    frames(composite.into_iter().map(Into::<Sample>::into))
        .map(move |window| correlate_window(&window, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{to_bits, to_bytes};
    use crate::spreader::to_chips;

    #[test]
    fn test_clean_signal_correlates_to_code_weight() {
        let code = SpreadingCode::new(0b0110_1110);
        let chips: Vec<i32> = to_chips([1, 0, 1], code).collect();
        let corr: Vec<Sample> = get_correlation(chips, code).collect();
        assert_eq!(corr, vec![5.0, -5.0, 5.0]);
    }

    #[test]
    fn test_code_bits_are_zero_one_coefficients() {
        let code = SpreadingCode::new(0b1000_0001);
        let window = [2.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 3.0];
        assert_eq!(correlate_window(&window, code), 5.0);
    }

    #[test]
    fn test_partial_window_discarded() {
        let code = SpreadingCode::new(0xFF);
        let samples = vec![1.0; 8 * 3 + 5];
        assert_eq!(get_correlation(samples, code).count(), 3);
        assert_eq!(get_correlation(vec![1.0; 7], code).count(), 0);
        assert_eq!(get_correlation(Vec::<Sample>::new(), code).count(), 0);
    }

    #[test]
    fn test_one_value_per_bit() {
        let code = SpreadingCode::new(0b1010_1101);
        let chips = to_chips(to_bits(to_bytes("Aerospace")), code);
        assert_eq!(get_correlation(chips, code).count(), 9 * 8);
    }
}
