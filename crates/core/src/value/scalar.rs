//! Immutable scalar: one value plus its unit

use super::{si_to_value, value_to_si, Absolute, Kind, KindFor, Relative};
use crate::element::Element;
use crate::quantities::DimensionlessUnit;
use crate::unit::{AbsoluteUnit, Unit};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A value in a unit, relative or absolute
///
/// Equality and ordering compare SI values, so `1 km == 1000 m`. Ordering
/// is total (NaN sorts above every other value).
///
/// # Usage
/// ```
/// use quantity_core::quantities::{AbsoluteTemperature, AbsoluteTemperatureUnit, Length, LengthUnit};
///
/// let a = Length::new(1.5, LengthUnit::Kilometer);
/// let b = Length::new(500.0, LengthUnit::Meter);
/// assert_eq!((a + b).value(), 2.0);
///
/// let morning = AbsoluteTemperature::new(12.0, AbsoluteTemperatureUnit::DegreeCelsius);
/// let noon = AbsoluteTemperature::new(21.0, AbsoluteTemperatureUnit::DegreeCelsius);
/// assert!(((noon - morning).value() - 9.0).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Scalar<U, K = Relative, T = f64> {
    value: T,
    unit: U,
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<U: Unit, K: KindFor<U>, T: Element> Scalar<U, K, T> {
    /// Create a scalar from a value expressed in `unit`
    #[inline]
    pub fn new(value: T, unit: U) -> Self {
        Self {
            value,
            unit,
            kind: PhantomData,
        }
    }

    /// Create a scalar from a value in the SI unit
    #[inline]
    pub fn si(value_si: T) -> Self {
        Self::new(value_si, U::si())
    }

    /// Create a scalar from an SI value, expressed in `unit`
    #[inline]
    pub fn from_si(value_si: T, unit: U) -> Self {
        Self::new(si_to_value(value_si, unit), unit)
    }
}

impl<U: Unit, K: Kind, T: Element> Scalar<U, K, T> {
    /// Value expressed in [`Self::unit`]
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// Display unit
    #[inline]
    pub fn unit(&self) -> U {
        self.unit
    }

    /// Value in the SI unit
    #[inline]
    pub fn si_value(&self) -> T {
        value_to_si(self.value, self.unit)
    }

    /// Value expressed in `unit`
    #[inline]
    pub fn in_unit(&self, unit: U) -> T {
        if unit == self.unit {
            return self.value;
        }
        T::from_f64(self.unit.convert(self.value.to_f64(), unit))
    }

    /// The same quantity expressed in `unit`
    #[inline]
    pub fn to_unit(&self, unit: U) -> Self {
        Self {
            value: self.in_unit(unit),
            unit,
            kind: PhantomData,
        }
    }

    /// The same quantity expressed in the SI unit
    #[inline]
    pub fn to_si_unit(&self) -> Self {
        self.to_unit(U::si())
    }

    /// Whether the value is exactly zero in SI
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.si_value().is_zero()
    }

    fn si_f64(&self) -> f64 {
        self.unit.to_si(self.value.to_f64())
    }

    /// Linear interpolation between `zero` (ratio 0) and `one` (ratio 1),
    /// expressed in `zero`'s unit
    pub fn interpolate(zero: &Self, one: &Self, ratio: T) -> Self {
        let r = ratio.to_f64();
        let si = zero.si_f64() * (1.0 - r) + one.si_f64() * r;
        Self {
            value: T::from_f64(zero.unit.from_si(si)),
            unit: zero.unit,
            kind: PhantomData,
        }
    }
}

impl<U: Unit, T: Element> Scalar<U, Relative, T> {
    /// Absolute value
    #[inline]
    pub fn abs(&self) -> Self {
        Self::new(self.value.abs(), self.unit)
    }

    /// Add an absolute value to this relative one; the result is absolute,
    /// expressed in `absolute`'s unit
    pub fn plus_abs<A>(&self, absolute: Scalar<A, Absolute, T>) -> Scalar<A, Absolute, T>
    where
        A: AbsoluteUnit<Relative = U>,
    {
        absolute + *self
    }
}

impl<U: Unit, K: Kind, T: Element> PartialEq for Scalar<U, K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<U: Unit, K: Kind, T: Element> Eq for Scalar<U, K, T> {}

impl<U: Unit, K: Kind, T: Element> PartialOrd for Scalar<U, K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<U: Unit, K: Kind, T: Element> Ord for Scalar<U, K, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.si_f64().total_cmp(&other.si_f64())
    }
}

impl<U: Unit, K: Kind, T: Element> fmt::Debug for Scalar<U, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar")
            .field("kind", &K::NAME)
            .field("value", &self.value)
            .field("unit", &self.unit)
            .finish()
    }
}

impl<U: Unit, K: Kind, T: Element> fmt::Display for Scalar<U, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} {}", p, self.value, self.unit.abbreviation()),
            None => write!(f, "{} {}", self.value, self.unit.abbreviation()),
        }
    }
}

// Relative + Relative = Relative, in the left operand's unit
impl<U: Unit, T: Element> Add for Scalar<U, Relative, T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.in_unit(self.unit), self.unit)
    }
}

// Relative - Relative = Relative, in the left operand's unit
impl<U: Unit, T: Element> Sub for Scalar<U, Relative, T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.in_unit(self.unit), self.unit)
    }
}

impl<U: Unit, T: Element> Neg for Scalar<U, Relative, T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value, self.unit)
    }
}

impl<U: Unit, T: Element> Mul<T> for Scalar<U, Relative, T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self::new(self.value * rhs, self.unit)
    }
}

// Division by a number follows IEEE semantics, like the primitive it wraps
impl<U: Unit, T: Element> Div<T> for Scalar<U, Relative, T> {
    type Output = Self;
    fn div(self, rhs: T) -> Self {
        Self::new(self.value / rhs, self.unit)
    }
}

// Relative * Dimensionless = Relative
impl<U: Unit, T: Element> Mul<Scalar<DimensionlessUnit, Relative, T>> for Scalar<U, Relative, T> {
    type Output = Self;
    fn mul(self, rhs: Scalar<DimensionlessUnit, Relative, T>) -> Self {
        Self::new(self.value * rhs.si_value(), self.unit)
    }
}

// Relative / Relative of the same quantity = Dimensionless ratio
impl<U: Unit, T: Element> Div for Scalar<U, Relative, T> {
    type Output = Scalar<DimensionlessUnit, Relative, T>;
    fn div(self, rhs: Self) -> Self::Output {
        Scalar::si(self.si_value() / rhs.si_value())
    }
}

// Absolute + Relative = Absolute, in the absolute operand's unit
impl<A: AbsoluteUnit, T: Element> Add<Scalar<A::Relative, Relative, T>> for Scalar<A, Absolute, T> {
    type Output = Self;
    fn add(self, rhs: Scalar<A::Relative, Relative, T>) -> Self {
        let si = self.si_f64() + rhs.si_f64();
        Self::new(T::from_f64(self.unit.from_si(si)), self.unit)
    }
}

// Absolute - Relative = Absolute, in the absolute operand's unit
impl<A: AbsoluteUnit, T: Element> Sub<Scalar<A::Relative, Relative, T>> for Scalar<A, Absolute, T> {
    type Output = Self;
    fn sub(self, rhs: Scalar<A::Relative, Relative, T>) -> Self {
        let si = self.si_f64() - rhs.si_f64();
        Self::new(T::from_f64(self.unit.from_si(si)), self.unit)
    }
}

// Absolute - Absolute = Relative, in the left operand's relative unit
impl<A: AbsoluteUnit, T: Element> Sub for Scalar<A, Absolute, T> {
    type Output = Scalar<A::Relative, Relative, T>;
    fn sub(self, rhs: Self) -> Self::Output {
        let difference = self.si_f64() - rhs.si_f64();
        let unit = self.unit.relative();
        Scalar::new(T::from_f64(unit.from_si(difference)), unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantities::{
        AbsoluteTemperature, AbsoluteTemperatureUnit, Dimensionless, Duration, DurationUnit,
        FloatLength, Length, LengthUnit, Temperature, TemperatureUnit, Time, TimeUnit,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_relative_add_uses_left_unit() {
        let a = Length::new(1.0, LengthUnit::Kilometer);
        let b = Length::new(250.0, LengthUnit::Meter);
        let sum = a + b;
        assert_eq!(sum.unit(), LengthUnit::Kilometer);
        assert_relative_eq!(sum.value(), 1.25);
        assert_relative_eq!((b - a).value(), -750.0);
    }

    #[test]
    fn test_equality_by_si_value() {
        assert_eq!(
            Length::new(1.0, LengthUnit::Kilometer),
            Length::new(1000.0, LengthUnit::Meter)
        );
        assert!(Length::new(1.0, LengthUnit::Foot) < Length::new(1.0, LengthUnit::Meter));
        let longest = [
            Length::new(3.0, LengthUnit::Foot),
            Length::new(1.0, LengthUnit::Meter),
            Length::new(30.0, LengthUnit::Inch),
        ]
        .into_iter()
        .max()
        .unwrap();
        assert_eq!(longest.unit(), LengthUnit::Meter);
    }

    #[test]
    fn test_absolute_minus_absolute_is_relative() {
        let freezing = AbsoluteTemperature::new(32.0, AbsoluteTemperatureUnit::DegreeFahrenheit);
        let boiling = AbsoluteTemperature::new(212.0, AbsoluteTemperatureUnit::DegreeFahrenheit);
        let delta: Temperature = boiling - freezing;
        assert_eq!(delta.unit(), TemperatureUnit::DegreeFahrenheit);
        assert_relative_eq!(delta.value(), 180.0, epsilon = 1e-9);
        assert_relative_eq!(delta.si_value(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_absolute_plus_relative_is_absolute() {
        let t = AbsoluteTemperature::new(20.0, AbsoluteTemperatureUnit::DegreeCelsius);
        let warmer = t + Temperature::new(5.0, TemperatureUnit::Kelvin);
        assert_eq!(warmer.unit(), AbsoluteTemperatureUnit::DegreeCelsius);
        assert_relative_eq!(warmer.value(), 25.0, epsilon = 1e-9);

        let colder = t - Temperature::new(9.0, TemperatureUnit::DegreeFahrenheit);
        assert_relative_eq!(colder.value(), 15.0, epsilon = 1e-9);

        let start = Time::new(10.0, TimeUnit::BaseHour);
        let later = Duration::new(30.0, DurationUnit::Minute).plus_abs(start);
        assert_relative_eq!(later.value(), 10.5, epsilon = 1e-12);
    }

    #[test]
    fn test_ratio_and_dimensionless_factor() {
        let a = Length::new(3.0, LengthUnit::Kilometer);
        let b = Length::new(1500.0, LengthUnit::Meter);
        let ratio: Dimensionless = a / b;
        assert_relative_eq!(ratio.value(), 2.0);
        let scaled = b * ratio;
        assert_relative_eq!(scaled.value(), 3000.0);
        assert_relative_eq!((a * 2.0).value(), 6.0);
        assert_relative_eq!((a / 4.0).value(), 0.75);
        assert_relative_eq!((-a).abs().value(), 3.0);
    }

    #[test]
    fn test_conversion_and_si() {
        let t = AbsoluteTemperature::new(25.0, AbsoluteTemperatureUnit::DegreeCelsius);
        assert_relative_eq!(t.si_value(), 298.15, epsilon = 1e-9);
        assert_relative_eq!(
            t.in_unit(AbsoluteTemperatureUnit::DegreeFahrenheit),
            77.0,
            epsilon = 1e-9
        );
        let k = t.to_si_unit();
        assert_eq!(k.unit(), AbsoluteTemperatureUnit::Kelvin);
        let km = Length::from_si(2500.0, LengthUnit::Kilometer);
        assert_eq!(km.value(), 2.5);
        assert_eq!(Length::si(4.0).unit(), LengthUnit::Meter);
    }

    #[test]
    fn test_interpolate() {
        let zero = Length::new(0.0, LengthUnit::Kilometer);
        let one = Length::new(2000.0, LengthUnit::Meter);
        let mid = Length::interpolate(&zero, &one, 0.25);
        assert_eq!(mid.unit(), LengthUnit::Kilometer);
        assert_relative_eq!(mid.value(), 0.5);
    }

    #[test]
    fn test_float_precision_and_display() {
        let l = FloatLength::new(2.5, LengthUnit::Kilometer);
        assert_eq!(l.si_value(), 2500.0_f32);
        assert_eq!(format!("{:.2}", l), "2.50 km");
        assert_eq!(Length::new(3.0, LengthUnit::Meter).to_string(), "3 m");
    }

    #[test]
    fn test_serde_round_trip_keeps_unit() {
        let l = Length::new(4.0, LengthUnit::Foot);
        let json = serde_json::to_string(&l).unwrap();
        assert_eq!(json, r#"{"value":4.0,"unit":"ft"}"#);
        let back: Length = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unit(), LengthUnit::Foot);
        assert_eq!(back, l);
    }
}
