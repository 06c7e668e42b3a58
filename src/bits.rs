//! Byte/bit conversion (MSB first) and the lazy byte and bit streams built on it.

use crate::error::{CdmaError, Result};

/// A single data or code bit, always 0 or 1.
pub type Bit = u8;

/// Bits per byte, and therefore chips per bit and bits per assembled byte.
pub const BITS_PER_BYTE: usize = 8;

/// Expand a byte into its 8 bits, most-significant bit first.
pub fn to_bin(byte: u8) -> [Bit; BITS_PER_BYTE] {
    let mut bits = [0; BITS_PER_BYTE];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (byte >> (BITS_PER_BYTE - 1 - i)) & 1;
    }
    bits
}

/// Like [`to_bin`] for a wider integer; anything outside 0..=255 is rejected.
pub fn try_to_bin(value: i64) -> Result<[Bit; BITS_PER_BYTE]> {
    u8::try_from(value)
        .map(to_bin)
        .map_err(|_| CdmaError::InvalidInput(format!("{} is not a byte value (0-255)", value)))
}

/// Rebuild a byte from 8 bits, MSB first. Only the low bit of each entry is used.
pub fn from_bin(bits: &[Bit; BITS_PER_BYTE]) -> u8 {
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1))
}

/// Stream the UTF-8 bytes of `text` in order.
pub fn to_bytes(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.bytes()
}

/// Stream 8 bits per byte, preserving byte order and MSB-first bit order.
///
/// Single pass: once the byte source is exhausted so is this stream.
pub fn to_bits<I>(bytes: I) -> impl Iterator<Item = Bit>
where
    I: IntoIterator<Item = u8>,
{
    bytes.into_iter().flat_map(to_bin)
}
