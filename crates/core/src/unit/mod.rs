//! Units of measurement and their conversion to SI
//!
//! A unit belongs to one quantity (Length, Temperature, ...) and converts to
//! that quantity's SI unit through a [`Scale`]. Unit tables are plain enums
//! generated by [`define_units!`](crate::define_units); every value type
//! stores SI values and keeps only a copy of its display unit.
//!
//! # Usage
//! ```
//! use quantity_core::quantities::LengthUnit;
//! use quantity_core::unit::Unit;
//!
//! assert_eq!(LengthUnit::Kilometer.to_si(2.5), 2500.0);
//! assert_eq!(LengthUnit::Kilometer.from_si(2500.0), 2.5);
//! assert_eq!(LengthUnit::from_abbreviation("ft").unwrap(), LengthUnit::Foot);
//! ```

pub mod scale;

pub use scale::Scale;

use crate::error::{Result, ValueError};
use std::fmt;
use std::hash::Hash;

/// A unit of one physical quantity
pub trait Unit: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Name of the quantity all units of this type measure
    const QUANTITY: &'static str;

    /// The SI (standard) unit of the quantity
    fn si() -> Self;

    /// Every unit of the quantity, SI unit first
    fn all() -> &'static [Self];

    /// Conversion to the SI unit
    fn scale(self) -> Scale;

    /// Display abbreviation, e.g. `"km"`
    fn abbreviation(self) -> &'static str;

    /// Full name, e.g. `"kilometer"`
    fn name(self) -> &'static str;

    /// Look a unit up by its display abbreviation.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownUnit`] when no unit of the quantity uses
    /// `abbreviation`.
    fn from_abbreviation(abbreviation: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|u| u.abbreviation() == abbreviation)
            .ok_or_else(|| ValueError::UnknownUnit(abbreviation.to_string()))
    }

    /// Whether this unit is the SI unit
    #[inline]
    fn is_si(self) -> bool {
        self == Self::si()
    }

    /// Express `value` in this unit as an SI value: `value * factor + offset`
    #[inline]
    fn to_si(self, value: f64) -> f64 {
        self.scale().to_si(value)
    }

    /// Express an SI value in this unit: `(si - offset) / factor`
    #[inline]
    fn from_si(self, value_si: f64) -> f64 {
        self.scale().from_si(value_si)
    }

    /// Convert `value` from this unit to `target`; exact when `target == self`
    #[inline]
    fn convert(self, value: f64, target: Self) -> f64 {
        if self == target {
            return value;
        }
        Scale::convert(value, &self.scale(), &target.scale())
    }
}

/// A unit anchored to a fixed origin (a point in time, an absolute temperature).
///
/// Differences of two absolute values are expressed in the associated
/// relative unit; absolute plus relative is absolute again.
pub trait AbsoluteUnit: Unit {
    /// Unit type of differences between absolute values
    type Relative: Unit;

    /// The relative unit with the same scale factor as this unit
    fn relative(self) -> Self::Relative;
}

/// Express `value` in `unit` as an SI value
#[inline]
pub fn to_si<U: Unit>(value: f64, unit: U) -> f64 {
    unit.to_si(value)
}

/// Express an SI value in `unit`
#[inline]
pub fn from_si<U: Unit>(value_si: f64, unit: U) -> f64 {
    unit.from_si(value_si)
}

/// Convert `value` from one unit to another of the same quantity
#[inline]
pub fn convert<U: Unit>(value: f64, from: U, to: U) -> f64 {
    from.convert(value, to)
}

/// Generate a unit enum and its [`Unit`] implementation from a table.
///
/// Each row is `Variant => ("abbreviation", "name", factor, offset)`, with
/// `si = Variant` naming the standard unit, which must come first. Every
/// variant is documented with its name and abbreviation.
///
/// Scales are built in a const context, so a row with a zero or non-finite
/// factor is rejected when the table is compiled:
///
/// ```compile_fail
/// quantity_core::define_units! {
///     /// Units with a degenerate factor
///     pub enum FlatUnit: "Flat", si = One {
///         One => ("u", "unit", 1.0, 0.0),
///         Nothing => ("n", "nothing", 0.0, 0.0),
///     }
/// }
/// use quantity_core::unit::Unit;
/// assert_eq!(FlatUnit::Nothing.to_si(1.0), 0.0);
/// ```
///
/// ```
/// quantity_core::define_units! {
///     /// Units of area
///     pub enum AreaUnit: "Area", si = SquareMeter {
///         SquareMeter => ("m2", "square meter", 1.0, 0.0),
///         Hectare => ("ha", "hectare", 10_000.0, 0.0),
///     }
/// }
/// use quantity_core::unit::Unit;
/// assert_eq!(AreaUnit::Hectare.to_si(1.5), 15_000.0);
/// ```
#[macro_export]
macro_rules! define_units {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $quantity:literal, si = $si:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($abbr:literal, $uname:literal, $factor:expr, $offset:expr)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = concat!("The ", $uname, " (`", $abbr, "`)")]
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::unit::Unit for $name {
            const QUANTITY: &'static str = $quantity;

            #[inline]
            fn si() -> Self {
                Self::$si
            }

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            #[inline]
            fn scale(self) -> $crate::unit::Scale {
                match self {
                    $(Self::$variant => const { $crate::unit::Scale::new($factor, $offset) },)+
                }
            }

            #[inline]
            fn abbreviation(self) -> &'static str {
                match self {
                    $(Self::$variant => $abbr,)+
                }
            }

            #[inline]
            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $uname,)+
                }
            }
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::$si
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::unit::Unit::abbreviation(*self))
            }
        }

        // Units serialize as their abbreviation
        impl $crate::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                serializer.serialize_str($crate::unit::Unit::abbreviation(*self))
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                let abbreviation =
                    <::std::string::String as $crate::__serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::unit::Unit>::from_abbreviation(&abbreviation)
                    .map_err(<D::Error as $crate::__serde::de::Error>::custom)
            }
        }
    };
}
