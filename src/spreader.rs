//! Spreading: every data bit becomes 8 chips shaped by the user's code.

use crate::bits::Bit;
use crate::code::SpreadingCode;

/// One unit of the spread signal, +/-1 straight out of the spreader.
pub type Chip = i32;

/// Spread `bits` with `code`, 8 chips per bit.
///
/// A 1 bit emits the code polarities as-is, a 0 bit emits them negated.
/// An empty bit stream yields an empty chip stream.
pub fn to_chips<I>(bits: I, code: SpreadingCode) -> impl Iterator<Item = Chip>
where
    I: IntoIterator<Item = Bit>,
{
    let polarities = code.polarities();
    bits.into_iter().flat_map(move |bit| {
        let symbol: Chip = if bit > 0 { 1 } else { -1 };
        polarities.map(|p| symbol * p)
    })
}
