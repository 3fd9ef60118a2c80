//! Affine conversion between a unit and the SI unit of its quantity

use crate::error::{Result, ValueError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversion of a unit to its quantity's SI unit: `si = value * factor + offset`.
///
/// Relative units (meter, foot, second, degree Celsius difference) have a
/// zero offset. Absolute units anchored to a different origin than the SI
/// unit (degree Celsius and Fahrenheit on the Kelvin scale) carry an offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    factor: f64,
    offset: f64,
}

impl Scale {
    /// The identity scale of an SI unit
    pub const SI: Scale = Scale {
        factor: 1.0,
        offset: 0.0,
    };

    /// Create an offset-linear scale. Asserts the factor is nonzero and
    /// finite and the offset is finite.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(factor: f64, offset: f64) -> Self {
        assert!(
            factor != 0.0 && factor.is_finite(),
            "Scale::new: factor must be nonzero and finite"
        );
        assert!(offset.is_finite(), "Scale::new: offset must be finite");
        Scale { factor, offset }
    }

    /// Create a purely multiplicative scale
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn linear(factor: f64) -> Self {
        Self::new(factor, 0.0)
    }

    /// Fallible constructor for scales built from runtime data.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidScale`] when the factor is zero or not
    /// finite, or the offset is not finite.
    pub fn try_new(factor: f64, offset: f64) -> Result<Self> {
        if factor == 0.0 || !factor.is_finite() || !offset.is_finite() {
            return Err(ValueError::InvalidScale { factor, offset });
        }
        Ok(Scale { factor, offset })
    }

    /// Multiplicative factor to the SI unit
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Additive offset to the SI unit (zero for relative units)
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether this is the identity scale
    #[inline]
    pub fn is_base(&self) -> bool {
        self.factor == 1.0 && self.offset == 0.0
    }

    /// Express `value` (in this scale's unit) in the SI unit
    #[inline]
    pub fn to_si(&self, value: f64) -> f64 {
        if self.is_base() {
            return value;
        }
        value * self.factor + self.offset
    }

    /// Express an SI value in this scale's unit
    #[inline]
    pub fn from_si(&self, value_si: f64) -> f64 {
        if self.is_base() {
            return value_si;
        }
        (value_si - self.offset) / self.factor
    }

    /// Convert `value` from the `from` scale to the `to` scale.
    /// Returns `value` unchanged when both scales are equal.
    #[inline]
    pub fn convert(value: f64, from: &Scale, to: &Scale) -> f64 {
        if from == to {
            return value;
        }
        to.from_si(from.to_si(value))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::SI
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset == 0.0 {
            write!(f, "x{}", self.factor)
        } else {
            write!(f, "x{} {:+}", self.factor, self.offset)
        }
    }
}
