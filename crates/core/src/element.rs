//! Numeric element type for scalar values and container storage
//!
//! Quantities are stored either in double precision (`f64`) or single
//! precision (`f32`). Unit conversion arithmetic always runs in `f64`;
//! the element type only decides what gets stored.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Trait for the floating point types a quantity can be stored as
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - cells are shared with rayon workers
/// - arithmetic operators with `Output = Self` and their assigning forms
/// - `Serialize + DeserializeOwned` - storage derives serde
pub trait Element:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Serialize
    + DeserializeOwned
{
    /// Additive identity
    const ZERO: Self;

    /// Multiplicative identity
    const ONE: Self;

    /// Short name used in debug output ("double" or "float")
    const NAME: &'static str;

    /// Widen to `f64` for conversion arithmetic
    fn to_f64(self) -> f64;

    /// Narrow from `f64` after conversion arithmetic
    fn from_f64(v: f64) -> Self;

    /// Convert a cell count to this type
    fn from_usize(n: usize) -> Self {
        Self::from_f64(n as f64)
    }

    /// Whether the value is exactly zero (sparse storage drops such cells)
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Absolute value
    fn abs(self) -> Self;

    /// Smallest integer value not less than `self`
    fn ceil(self) -> Self;

    /// Largest integer value not greater than `self`
    fn floor(self) -> Self;

    /// Nearest integer, ties away from zero
    fn round(self) -> Self;

    /// Nearest integer, ties to even
    fn rint(self) -> Self;

    /// Square root
    fn sqrt(self) -> Self;

    /// `e^self`
    fn exp(self) -> Self;

    /// Natural logarithm
    fn ln(self) -> Self;

    /// `self^exponent`
    fn powf(self, exponent: Self) -> Self;

    /// Neither infinite nor NaN
    fn is_finite(self) -> bool;
}

macro_rules! impl_element {
    ($t:ty, $name:literal) => {
        impl Element for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const NAME: &'static str = $name;

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn abs(self) -> Self {
                <$t>::abs(self)
            }

            #[inline]
            fn ceil(self) -> Self {
                <$t>::ceil(self)
            }

            #[inline]
            fn floor(self) -> Self {
                <$t>::floor(self)
            }

            #[inline]
            fn round(self) -> Self {
                <$t>::round(self)
            }

            #[inline]
            fn rint(self) -> Self {
                <$t>::round_ties_even(self)
            }

            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline]
            fn exp(self) -> Self {
                <$t>::exp(self)
            }

            #[inline]
            fn ln(self) -> Self {
                <$t>::ln(self)
            }

            #[inline]
            fn powf(self, exponent: Self) -> Self {
                <$t>::powf(self, exponent)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }
        }
    };
}

impl_element!(f64, "double");
impl_element!(f32, "float");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_round_trip_through_f64() {
        let v: f32 = 2.5;
        assert_eq!(<f32 as Element>::from_f64(v.to_f64()), 2.5);
    }

    #[test]
    fn test_rint_ties_to_even() {
        assert_eq!(Element::rint(2.5_f64), 2.0);
        assert_eq!(Element::rint(3.5_f64), 4.0);
        assert_eq!(Element::round(2.5_f64), 3.0);
        assert_eq!(Element::rint(-2.5_f32), -2.0);
    }

    #[test]
    fn test_is_zero_treats_negative_zero_as_zero() {
        assert!(Element::is_zero(-0.0_f64));
        assert!(!Element::is_zero(1e-300_f64));
    }
}
