use std::ops::RangeInclusive;

/// Helper methods to manipulate bits of a status or register word.
/// The index (`bit_idx`) goes from lsb to msb (right to left).
pub trait Bits: Copy {
    fn get_bit(self, bit_idx: u8) -> bool;

    fn set_bit(&mut self, bit_idx: u8, value: bool);

    /// Extracts `bits_range` and moves it down to bit 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;

    /// Returns a copy where `bits_range` is replaced by the same range of `source`.
    /// Every bit outside the range is kept as it is.
    #[must_use]
    fn with_bits_from(self, bits_range: RangeInclusive<u8>, source: Self) -> Self;
}

const fn range_mask(start: u8, end: u8) -> u32 {
    let length = end - start + 1;
    let ones = if length >= 32 {
        u32::MAX
    } else {
        (1 << length) - 1
    };

    ones << start
}

impl Bits for u32 {
    fn get_bit(self, bit_idx: u8) -> bool {
        debug_assert!(bit_idx < 32);
        self & (1 << bit_idx) != 0
    }

    fn set_bit(&mut self, bit_idx: u8, value: bool) {
        debug_assert!(bit_idx < 32);
        if value {
            *self |= 1 << bit_idx;
        } else {
            *self &= !(1 << bit_idx);
        }
    }

    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
        let (start, end) = bits_range.into_inner();
        debug_assert!(start <= end && end < 32);

        (self & range_mask(start, end)) >> start
    }

    fn with_bits_from(self, bits_range: RangeInclusive<u8>, source: Self) -> Self {
        let (start, end) = bits_range.into_inner();
        debug_assert!(start <= end && end < 32);

        let mask = range_mask(start, end);
        (self & !mask) | (source & mask)
    }
}
