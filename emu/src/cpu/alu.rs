//! # Flag-setting arithmetic
//!
//! The four primitives every ADD/ADC/SUB/SBC/RSB/RSC/CMP/CMN (and their
//! THUMB forms) reduce to. They are pure: the caller decides whether the
//! flags end up in the CPSR through [`Psr::set_flags`](super::psr::Psr::set_flags).
//!
//! Overflow compares operands and result as signed 32-bit values. For
//! subtraction the zero boundary is asymmetric:
//!
//! ```text
//! a >= 0 && b <= 0 && result <  0   -> V
//! a <  0 && b >  0 && result >= 0   -> V
//! ```

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;

/// Result word and N/Z/C/V produced by one flag-setting operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticOpResult {
    pub result: u32,
    pub sign: bool,
    pub zero: bool,
    pub carry: bool,
    pub overflow: bool,
}

impl ArithmeticOpResult {
    fn new(result: u32, carry: bool, overflow: bool) -> Self {
        Self {
            result,
            sign: result.get_bit(31),
            zero: result == 0,
            carry,
            overflow,
        }
    }
}

const fn add_overflow(a: u32, b: u32, result: u32) -> bool {
    let (a, b, r) = (a as i32, b as i32, result as i32);
    (a >= 0 && b >= 0 && r < 0) || (a < 0 && b < 0 && r >= 0)
}

const fn sub_overflow(a: u32, b: u32, result: u32) -> bool {
    let (a, b, r) = (a as i32, b as i32, result as i32);
    (a >= 0 && b <= 0 && r < 0) || (a < 0 && b > 0 && r >= 0)
}

/// `a + b`. C is the unsigned carry out of bit 31.
#[must_use]
pub fn add(a: u32, b: u32) -> ArithmeticOpResult {
    // The sum is done in 64 bits so that bit 32 is the carry.
    let wide = u64::from(a) + u64::from(b);
    let result = wide as u32;

    ArithmeticOpResult::new(
        result,
        wide > u64::from(u32::MAX),
        add_overflow(a, b, result),
    )
}

/// `a - b`. C is set when no borrow occurred, that is `a >= b` unsigned.
#[must_use]
pub fn sub(a: u32, b: u32) -> ArithmeticOpResult {
    let result = a.wrapping_sub(b);

    ArithmeticOpResult::new(result, a >= b, sub_overflow(a, b, result))
}

/// `a + b + carry_in`, carry and overflow computed over the three terms.
#[must_use]
pub fn add_with_carry(a: u32, b: u32, carry_in: bool) -> ArithmeticOpResult {
    let wide = u64::from(a) + u64::from(b) + u64::from(carry_in);
    let result = wide as u32;

    ArithmeticOpResult::new(
        result,
        wide > u64::from(u32::MAX),
        add_overflow(a, b, result),
    )
}

/// `a - b - NOT carry_in`. C is set when the 33-bit difference is not negative.
#[must_use]
pub fn sub_with_carry(a: u32, b: u32, carry_in: bool) -> ArithmeticOpResult {
    let borrow = u32::from(!carry_in);
    let wide = i64::from(a) - i64::from(b) - i64::from(borrow);
    let result = a.wrapping_sub(b).wrapping_sub(borrow);

    ArithmeticOpResult::new(result, wide >= 0, sub_overflow(a, b, result))
}
