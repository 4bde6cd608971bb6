//! Fixed-point math utilities for deterministic stat computation.
//!
//! Item modifiers are fractional (`1.2` = +20%), aircraft stats are
//! integers. All mixing between the two goes through the helpers here so
//! truncation behaves the same on every platform.

use fixed::types::I32F32;

/// Fixed-point number type for all modifier math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// `1.0` in fixed-point.
pub const FIXED_ONE: Fixed = Fixed::from_bits(1 << 32);

/// `2.0` in fixed-point.
pub const FIXED_TWO: Fixed = Fixed::from_bits(2 << 32);

/// Smallest modifier treated as non-zero (about `1e-5`).
pub const MODIFIER_EPSILON: Fixed = Fixed::from_bits(42_950);

/// Convert a data-file decimal into fixed-point.
///
/// Returns `None` for NaN, infinities and values outside the fixed range.
#[must_use]
pub fn fixed_from_f64(value: f64) -> Option<Fixed> {
    Fixed::checked_from_num(value)
}

/// Slack added before truncating, about `0.001`.
///
/// Data-file decimals such as `1.2` are not exactly representable, so
/// `100 * 1.2` lands a hair below `120`.
const TRUNCATION_TOLERANCE: Fixed = Fixed::from_bits(4_294_967);

/// Truncate a fixed-point value toward zero, saturating at the `i32` range.
#[must_use]
pub fn truncate(value: Fixed) -> i32 {
    let magnitude = value
        .saturating_abs()
        .saturating_add(TRUNCATION_TOLERANCE)
        .round_to_zero()
        .saturating_to_num::<i32>();
    if value < Fixed::ZERO {
        -magnitude
    } else {
        magnitude
    }
}

/// Add a flat modifier to an integer stat.
///
/// The modifier is truncated toward zero before being added.
#[must_use]
pub fn add_flat(stat: i32, modifier: Fixed) -> i32 {
    stat.saturating_add(truncate(modifier))
}

/// Scale an integer stat by a multiplicative modifier, truncating toward zero.
#[must_use]
pub fn scale(stat: i32, modifier: Fixed) -> i32 {
    truncate(Fixed::saturating_from_num(stat).saturating_mul(modifier))
}
