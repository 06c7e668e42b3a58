//! Fixed 8-element windowing shared by the correlator and the byte assembler.

use crate::bits::BITS_PER_BYTE;

/// Number of elements per window: chips per bit, or bits per byte.
pub const FRAME_LEN: usize = BITS_PER_BYTE;

/// Consecutive, non-overlapping `[T; 8]` windows over an iterator.
///
/// A trailing partial window is dropped without error.
#[derive(Debug, Clone)]
pub struct Frames<I> {
    inner: I,
}

impl<I: Iterator> Iterator for Frames<I> {
    type Item = [I::Item; FRAME_LEN];

    fn next(&mut self) -> Option<Self::Item> {
        let window: Vec<I::Item> = self.inner.by_ref().take(FRAME_LEN).collect();
        window.try_into().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.inner.size_hint();
        (lo / FRAME_LEN, hi.map(|h| h / FRAME_LEN))
    }
}

/// Regroup `iter` into 8-element windows.
pub fn frames<I: IntoIterator>(iter: I) -> Frames<I::IntoIter> {
    Frames {
        inner: iter.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_frames() {
        let out: Vec<[u32; 8]> = frames(0..16).collect();
        assert_eq!(out, vec![[0, 1, 2, 3, 4, 5, 6, 7], [8, 9, 10, 11, 12, 13, 14, 15]]);
    }

    #[test]
    fn test_partial_trailing_frame_dropped() {
        assert_eq!(frames(0..15).count(), 1);
        assert_eq!(frames(0..7).count(), 0);
        assert_eq!(frames(std::iter::empty::<u8>()).count(), 0);
    }

    #[test]
    fn test_size_hint() {
        assert_eq!(frames(0..20).size_hint(), (2, Some(2)));
    }
}
