//! 22.10 fixed-point numbers.
//!
//! All sub-pixel layout math (run widths, pen positions, line heights) is
//! accumulated in [`Fixed`] so that summing many measured spans does not
//! drift the way repeated float rounding would. Values cross the public API
//! as whole pixels; [`Fixed::to_px`] rounds half up.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::Serialize;

/// A signed 22.10 fixed-point number: 22 integer bits, 10 fraction bits.
///
/// Arithmetic saturates instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// Number of fraction bits.
    pub const RADIX_POINT: u32 = 10;

    const ONE_RAW: i32 = 1 << Self::RADIX_POINT;
    const HALF_RAW: i64 = 1 << (Self::RADIX_POINT - 1);

    /// Zero.
    pub const ZERO: Self = Self(0);
    /// One pixel.
    pub const ONE: Self = Self(Self::ONE_RAW);
    /// Largest representable value.
    pub const MAX: Self = Self(i32::MAX);
    /// Largest whole pixel count that converts without saturating.
    pub const MAX_PX: u32 = (i32::MAX >> Self::RADIX_POINT) as u32;

    /// Wrap a raw 22.10 bit pattern.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw 22.10 bit pattern.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert whole pixels, saturating at [`Fixed::MAX`].
    #[must_use]
    pub const fn from_px(px: u32) -> Self {
        if px > Self::MAX_PX {
            Self::MAX
        } else {
            Self((px as i32) << Self::RADIX_POINT)
        }
    }

    /// Convert a float pixel quantity, rounding half up to the nearest
    /// 1/1024 px. NaN converts to zero; out-of-range values saturate.
    #[must_use]
    pub fn from_f32(px: f32) -> Self {
        let scaled = (px * Self::ONE_RAW as f32 + 0.5).floor();
        Self(scaled as i32)
    }

    /// Convert to whole pixels, rounding half up. Negative values clamp to
    /// zero since every API-visible quantity is non-negative.
    #[must_use]
    pub const fn to_px(self) -> u32 {
        if self.0 <= 0 {
            return 0;
        }
        ((self.0 as i64 + Self::HALF_RAW) >> Self::RADIX_POINT) as u32
    }

    /// Convert to a float pixel quantity.
    #[must_use]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE_RAW as f32
    }
}

impl Add for Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_round_trip() {
        assert_eq!(Fixed::from_px(0).to_px(), 0);
        assert_eq!(Fixed::from_px(17).to_px(), 17);
        assert_eq!(Fixed::from_px(17).raw(), 17 * 1024);
    }

    #[test]
    fn test_to_px_rounds_half_up() {
        // 2.5px rounds up, 2.499px rounds down.
        assert_eq!(Fixed::from_raw(2 * 1024 + 512).to_px(), 3);
        assert_eq!(Fixed::from_raw(2 * 1024 + 511).to_px(), 2);
        assert_eq!(Fixed::from_raw(2 * 1024 + 1023).to_px(), 3);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(Fixed::from_raw(-5000).to_px(), 0);
        assert_eq!((Fixed::from_px(1) - Fixed::from_px(4)).to_px(), 0);
    }

    #[test]
    fn test_from_f32_rounds_half_up() {
        assert_eq!(Fixed::from_f32(9.6).raw(), 9830);
        assert_eq!(Fixed::from_f32(0.5 / 1024.0).raw(), 1);
        assert_eq!(Fixed::from_f32(f32::NAN), Fixed::ZERO);
        assert_eq!(Fixed::from_f32(1.0e12), Fixed::MAX);
    }

    #[test]
    fn test_from_px_saturates() {
        assert_eq!(Fixed::from_px(u32::MAX), Fixed::MAX);
        assert_eq!(Fixed::from_px(Fixed::MAX_PX).to_px(), Fixed::MAX_PX);
    }

    #[test]
    fn test_arithmetic_saturates() {
        assert_eq!(Fixed::MAX + Fixed::ONE, Fixed::MAX);
        let sum: Fixed = [Fixed::from_f32(0.25); 8].into_iter().sum();
        assert_eq!(sum, Fixed::from_px(2));
    }

    #[test]
    fn test_accumulation_beats_per_span_rounding() {
        // Ten spans of 4.4px each: rounding each span first would give 40px.
        let total: Fixed = (0..10).map(|_| Fixed::from_f32(4.4)).sum();
        assert_eq!(total.to_px(), 44);
    }
}
