//! Unit-tagged values: scalars, vectors and matrices
//!
//! Every value is either [`Relative`] (a length, a duration, a temperature
//! difference) or [`Absolute`] (a position, a point in time, an absolute
//! temperature). The marker is a type parameter, so only these combinations
//! compile:
//! - relative ± relative = relative
//! - absolute ± relative = absolute, relative + absolute = absolute
//! - absolute - absolute = relative
//!
//! Vectors and matrices share their [`Storage`](crate::storage::Storage)
//! through an `Arc`; the mutable wrappers detach on first write.

// Must precede the child modules that expand it
macro_rules! impl_value_ops {
    ($immutable:ident, $mutable:ident) => {
        impl<U: $crate::unit::Unit, K: $crate::value::KindFor<U>, T: $crate::element::Element>
            $immutable<U, K, T>
        {
            fn wrap(data: $crate::storage::Storage<T>, unit: U) -> Self {
                Self {
                    data: ::std::sync::Arc::new(data),
                    unit,
                    kind: ::std::marker::PhantomData,
                }
            }

            /// Display unit
            #[inline]
            pub fn unit(&self) -> U {
                self.unit
            }

            /// Backing SI store
            #[inline]
            pub fn storage(&self) -> &$crate::storage::Storage<T> {
                &self.data
            }

            /// Dense or sparse
            #[inline]
            pub fn storage_type(&self) -> $crate::storage::StorageType {
                self.data.storage_type()
            }

            /// Whether every cell is stored
            #[inline]
            pub fn is_dense(&self) -> bool {
                self.storage_type() == $crate::storage::StorageType::Dense
            }

            /// Whether only non-zero cells are stored
            #[inline]
            pub fn is_sparse(&self) -> bool {
                self.storage_type() == $crate::storage::StorageType::Sparse
            }

            /// Number of non-zero cells
            pub fn cardinality(&self) -> usize {
                self.data.cardinality()
            }

            /// Sum of all cells, in SI
            pub fn z_sum(&self) -> T {
                self.data.z_sum()
            }

            /// Dense version of this value; shares storage when already dense
            pub fn to_dense(&self) -> Self {
                if self.is_dense() {
                    return self.clone();
                }
                Self::wrap(self.data.to_dense(), self.unit)
            }

            /// Sparse version of this value; shares storage when already sparse
            pub fn to_sparse(&self) -> Self {
                if self.is_sparse() {
                    return self.clone();
                }
                Self::wrap(self.data.to_sparse(), self.unit)
            }

            /// The same values displayed in `unit`; storage is shared
            pub fn to_unit(&self, unit: U) -> Self {
                Self {
                    data: ::std::sync::Arc::clone(&self.data),
                    unit,
                    kind: ::std::marker::PhantomData,
                }
            }

            /// The same values displayed in the SI unit
            pub fn to_si_unit(&self) -> Self {
                self.to_unit(U::si())
            }

            /// Mutable wrapper sharing this value's storage until its first write
            pub fn mutable(&self) -> $mutable<U, K, T> {
                $mutable {
                    inner: self.clone(),
                }
            }

            /// Whether both values are backed by the same storage
            pub fn shares_storage(&self, other: &Self) -> bool {
                ::std::sync::Arc::ptr_eq(&self.data, &other.data)
            }
        }

        impl<U: $crate::unit::Unit, T: $crate::element::Element>
            $immutable<U, $crate::value::Relative, T>
        {
            /// Elementwise sum, in this value's unit
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ.
            pub fn plus(&self, other: &Self) -> $crate::error::Result<Self> {
                let data = $crate::storage::ops::plus(&self.data, &other.data)?;
                Ok(Self::wrap(data, self.unit))
            }

            /// Elementwise difference, in this value's unit
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ.
            pub fn minus(&self, other: &Self) -> $crate::error::Result<Self> {
                let data = $crate::storage::ops::minus(&self.data, &other.data)?;
                Ok(Self::wrap(data, self.unit))
            }

            /// Elementwise product with dimensionless factors
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ.
            pub fn times(
                &self,
                factors: &$immutable<$crate::quantities::DimensionlessUnit, $crate::value::Relative, T>,
            ) -> $crate::error::Result<Self> {
                let data = $crate::storage::ops::times(&self.data, &factors.data)?;
                Ok(Self::wrap(data, self.unit))
            }

            /// Elementwise ratio of two values of the same quantity
            ///
            /// # Errors
            ///
            /// - [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch) when the shapes differ
            /// - [`ValueError::DivisionByZero`](crate::error::ValueError::DivisionByZero) when a divisor cell is zero
            pub fn divide(
                &self,
                other: &Self,
            ) -> $crate::error::Result<
                $immutable<$crate::quantities::DimensionlessUnit, $crate::value::Relative, T>,
            > {
                let data = $crate::storage::ops::divide(&self.data, &other.data)?;
                Ok($immutable::wrap(
                    data,
                    <$crate::quantities::DimensionlessUnit as $crate::unit::Unit>::si(),
                ))
            }

            /// Add absolute values; the result is absolute, in `absolute`'s unit
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ.
            pub fn plus_abs<A>(
                &self,
                absolute: &$immutable<A, $crate::value::Absolute, T>,
            ) -> $crate::error::Result<$immutable<A, $crate::value::Absolute, T>>
            where
                A: $crate::unit::AbsoluteUnit<Relative = U>,
            {
                let data = $crate::storage::ops::plus(&self.data, &absolute.data)?;
                Ok($immutable::wrap(data, absolute.unit))
            }
        }

        impl<A: $crate::unit::AbsoluteUnit, T: $crate::element::Element>
            $immutable<A, $crate::value::Absolute, T>
        {
            /// Shift by relative values, staying absolute
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ.
            pub fn plus_rel(
                &self,
                other: &$immutable<A::Relative, $crate::value::Relative, T>,
            ) -> $crate::error::Result<Self> {
                let data = $crate::storage::ops::plus(&self.data, &other.data)?;
                Ok(Self::wrap(data, self.unit))
            }

            /// Shift back by relative values, staying absolute
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ.
            pub fn minus_rel(
                &self,
                other: &$immutable<A::Relative, $crate::value::Relative, T>,
            ) -> $crate::error::Result<Self> {
                let data = $crate::storage::ops::minus(&self.data, &other.data)?;
                Ok(Self::wrap(data, self.unit))
            }

            /// Distance between two absolute values, in this unit's relative unit
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ.
            pub fn minus_abs(
                &self,
                other: &Self,
            ) -> $crate::error::Result<$immutable<A::Relative, $crate::value::Relative, T>> {
                let data = $crate::storage::ops::minus(&self.data, &other.data)?;
                Ok($immutable::wrap(
                    data,
                    $crate::unit::AbsoluteUnit::relative(self.unit),
                ))
            }
        }

        impl<U: $crate::unit::Unit, K: $crate::value::Kind, T: $crate::element::Element> PartialEq
            for $immutable<U, K, T>
        {
            /// Cell-for-cell SI equality; display units and storage types are ignored
            fn eq(&self, other: &Self) -> bool {
                *self.data == *other.data
            }
        }

        impl<U, K, T: $crate::element::Element> ::std::ops::Deref for $mutable<U, K, T> {
            type Target = $immutable<U, K, T>;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl<U: $crate::unit::Unit, K: $crate::value::KindFor<U>, T: $crate::element::Element>
            $mutable<U, K, T>
        {
            /// Storage for writing, detached from any other holder first
            fn data_mut(&mut self) -> &mut $crate::storage::Storage<T> {
                if ::std::sync::Arc::strong_count(&self.inner.data) > 1 {
                    tracing::debug!(
                        cells = self.inner.data.len(),
                        storage = %self.inner.data.storage_type(),
                        "Copy-on-write: detaching shared storage"
                    );
                }
                ::std::sync::Arc::make_mut(&mut self.inner.data)
            }

            /// Immutable value sharing this wrapper's current storage
            pub fn immutable(&self) -> $immutable<U, K, T> {
                self.inner.clone()
            }

            /// Change the display unit; stored SI values are untouched
            pub fn set_display_unit(&mut self, unit: U) -> &mut Self {
                self.inner.unit = unit;
                self
            }

            /// Apply `f` to every SI cell. Sparse storage stays sparse.
            pub fn assign<F>(&mut self, f: F) -> &mut Self
            where
                F: Fn(T) -> T + Send + Sync,
            {
                self.data_mut().assign(f);
                self
            }

            /// Round every SI cell up
            pub fn ceil(&mut self) -> &mut Self {
                self.assign(T::ceil)
            }

            /// Round every SI cell down
            pub fn floor(&mut self) -> &mut Self {
                self.assign(T::floor)
            }

            /// Round every SI cell to the nearest integer, ties to even
            pub fn rint(&mut self) -> &mut Self {
                self.assign(T::rint)
            }

            /// Round every SI cell to the nearest integer, ties away from zero
            pub fn round(&mut self) -> &mut Self {
                self.assign(T::round)
            }

            /// Switch to dense storage in place
            pub fn densify(&mut self) -> &mut Self {
                if self.inner.is_sparse() {
                    self.inner.data = ::std::sync::Arc::new(self.inner.data.to_dense());
                }
                self
            }

            /// Switch to sparse storage in place
            pub fn sparsify(&mut self) -> &mut Self {
                if self.inner.is_dense() {
                    self.inner.data = ::std::sync::Arc::new(self.inner.data.to_sparse());
                }
                self
            }
        }

        impl<U: $crate::unit::Unit, T: $crate::element::Element> $mutable<U, $crate::value::Relative, T> {
            /// Add `other` cell by cell, keeping this wrapper's storage type.
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ; the wrapper is unchanged.
            pub fn increment_by(
                &mut self,
                other: &$immutable<U, $crate::value::Relative, T>,
            ) -> $crate::error::Result<&mut Self> {
                let op = $crate::storage::ops::BinaryOp::Plus;
                $crate::storage::ops::check_operands(&self.inner.data, &other.data, op)?;
                $crate::storage::ops::elementwise_in_place(self.data_mut(), &other.data, op)?;
                Ok(self)
            }

            /// Subtract `other` cell by cell, keeping this wrapper's storage type.
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ; the wrapper is unchanged.
            pub fn decrement_by(
                &mut self,
                other: &$immutable<U, $crate::value::Relative, T>,
            ) -> $crate::error::Result<&mut Self> {
                let op = $crate::storage::ops::BinaryOp::Minus;
                $crate::storage::ops::check_operands(&self.inner.data, &other.data, op)?;
                $crate::storage::ops::elementwise_in_place(self.data_mut(), &other.data, op)?;
                Ok(self)
            }

            /// Add `increment` to every cell
            pub fn increment_by_scalar(
                &mut self,
                increment: $crate::value::Scalar<U, $crate::value::Relative, T>,
            ) -> &mut Self {
                self.data_mut().increment_by(increment.si_value());
                self
            }

            /// Subtract `decrement` from every cell
            pub fn decrement_by_scalar(
                &mut self,
                decrement: $crate::value::Scalar<U, $crate::value::Relative, T>,
            ) -> &mut Self {
                self.data_mut().decrement_by(decrement.si_value());
                self
            }

            /// Multiply every cell by `factor`
            pub fn multiply_by(&mut self, factor: T) -> &mut Self {
                self.data_mut().multiply_by(factor);
                self
            }

            /// Divide every cell by `divisor`
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::DivisionByZero`](crate::error::ValueError::DivisionByZero)
            /// when `divisor` is zero; the wrapper is unchanged.
            pub fn divide_by(&mut self, divisor: T) -> $crate::error::Result<&mut Self> {
                if $crate::element::Element::is_zero(divisor) {
                    tracing::debug!("Rejected division by a zero factor");
                    return Err($crate::error::ValueError::DivisionByZero { index: 0 });
                }
                self.data_mut().divide_by(divisor)?;
                Ok(self)
            }

            /// Multiply cell by cell with dimensionless factors
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ; the wrapper is unchanged.
            pub fn times_by(
                &mut self,
                factors: &$immutable<$crate::quantities::DimensionlessUnit, $crate::value::Relative, T>,
            ) -> $crate::error::Result<&mut Self> {
                let op = $crate::storage::ops::BinaryOp::Times;
                $crate::storage::ops::check_operands(&self.inner.data, &factors.data, op)?;
                $crate::storage::ops::elementwise_in_place(self.data_mut(), &factors.data, op)?;
                Ok(self)
            }

            /// Divide cell by cell by dimensionless divisors
            ///
            /// # Errors
            ///
            /// - [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch) when the shapes differ
            /// - [`ValueError::DivisionByZero`](crate::error::ValueError::DivisionByZero) when a divisor cell is zero
            ///
            /// The wrapper is unchanged on error.
            pub fn divide_by_elements(
                &mut self,
                divisors: &$immutable<$crate::quantities::DimensionlessUnit, $crate::value::Relative, T>,
            ) -> $crate::error::Result<&mut Self> {
                let op = $crate::storage::ops::BinaryOp::Divide;
                $crate::storage::ops::check_operands(&self.inner.data, &divisors.data, op)?;
                $crate::storage::ops::elementwise_in_place(self.data_mut(), &divisors.data, op)?;
                Ok(self)
            }

            /// Absolute value of every cell
            pub fn abs(&mut self) -> &mut Self {
                self.assign(T::abs)
            }

            /// Negate every cell
            pub fn neg(&mut self) -> &mut Self {
                self.assign(|v| -v)
            }

            /// Scale the cells so they sum to one
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::NormalizeZeroSum`](crate::error::ValueError::NormalizeZeroSum)
            /// when the cells sum to zero; the wrapper is unchanged.
            pub fn normalize(&mut self) -> $crate::error::Result<&mut Self> {
                if $crate::element::Element::is_zero(self.inner.data.z_sum()) {
                    tracing::debug!("Rejected normalize: values sum to zero");
                    return Err($crate::error::ValueError::NormalizeZeroSum);
                }
                self.data_mut().normalize()?;
                Ok(self)
            }
        }

        impl<A: $crate::unit::AbsoluteUnit, T: $crate::element::Element>
            $mutable<A, $crate::value::Absolute, T>
        {
            /// Shift by relative values cell by cell, keeping this wrapper's storage type.
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ; the wrapper is unchanged.
            pub fn increment_by(
                &mut self,
                other: &$immutable<A::Relative, $crate::value::Relative, T>,
            ) -> $crate::error::Result<&mut Self> {
                let op = $crate::storage::ops::BinaryOp::Plus;
                $crate::storage::ops::check_operands(&self.inner.data, &other.data, op)?;
                $crate::storage::ops::elementwise_in_place(self.data_mut(), &other.data, op)?;
                Ok(self)
            }

            /// Shift back by relative values cell by cell, keeping this wrapper's storage type.
            ///
            /// # Errors
            ///
            /// Returns [`ValueError::ShapeMismatch`](crate::error::ValueError::ShapeMismatch)
            /// when the shapes differ; the wrapper is unchanged.
            pub fn decrement_by(
                &mut self,
                other: &$immutable<A::Relative, $crate::value::Relative, T>,
            ) -> $crate::error::Result<&mut Self> {
                let op = $crate::storage::ops::BinaryOp::Minus;
                $crate::storage::ops::check_operands(&self.inner.data, &other.data, op)?;
                $crate::storage::ops::elementwise_in_place(self.data_mut(), &other.data, op)?;
                Ok(self)
            }

            /// Shift every cell by `increment`
            pub fn increment_by_scalar(
                &mut self,
                increment: $crate::value::Scalar<A::Relative, $crate::value::Relative, T>,
            ) -> &mut Self {
                self.data_mut().increment_by(increment.si_value());
                self
            }

            /// Shift every cell back by `decrement`
            pub fn decrement_by_scalar(
                &mut self,
                decrement: $crate::value::Scalar<A::Relative, $crate::value::Relative, T>,
            ) -> &mut Self {
                self.data_mut().decrement_by(decrement.si_value());
                self
            }
        }

        impl<T: $crate::element::Element>
            $mutable<$crate::quantities::DimensionlessUnit, $crate::value::Relative, T>
        {
            /// Square root of every cell
            pub fn sqrt(&mut self) -> &mut Self {
                self.assign(T::sqrt)
            }

            /// `e` raised to every cell
            pub fn exp(&mut self) -> &mut Self {
                self.assign(T::exp)
            }

            /// Natural logarithm of every cell
            pub fn ln(&mut self) -> &mut Self {
                self.assign(T::ln)
            }

            /// Raise every cell to `exponent`
            pub fn pow(&mut self, exponent: T) -> &mut Self {
                self.assign(move |v| $crate::element::Element::powf(v, exponent))
            }
        }
    };
}

pub mod matrix;
pub mod scalar;
pub mod vector;

pub use matrix::{Matrix, MutableMatrix};
pub use scalar::Scalar;
pub use vector::{MutableVector, Vector};

use crate::element::Element;
use crate::unit::{AbsoluteUnit, Unit};
use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Absolute {}
    impl Sealed for super::Relative {}
}

/// Absolute or relative marker
pub trait Kind: sealed::Sealed + Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Whether values of this kind are anchored to an origin
    const ABSOLUTE: bool;

    /// Label used in verbose formatting
    const NAME: &'static str;
}

/// Marker for quantities anchored to a fixed origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Absolute;

/// Marker for quantities without a fixed origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Relative;

impl Kind for Absolute {
    const ABSOLUTE: bool = true;
    const NAME: &'static str = "Abs";
}

impl Kind for Relative {
    const ABSOLUTE: bool = false;
    const NAME: &'static str = "Rel";
}

/// Kinds a unit type may be used with: every unit can be relative, only
/// [`AbsoluteUnit`]s can be absolute.
pub trait KindFor<U: Unit>: Kind {}

impl<U: Unit> KindFor<U> for Relative {}

impl<A: AbsoluteUnit> KindFor<A> for Absolute {}

/// Convert a value expressed in `unit` to an SI element
#[inline]
pub(crate) fn value_to_si<U: Unit, T: Element>(value: T, unit: U) -> T {
    if unit.is_si() {
        return value;
    }
    T::from_f64(unit.to_si(value.to_f64()))
}

/// Convert an SI element to a value expressed in `unit`
#[inline]
pub(crate) fn si_to_value<U: Unit, T: Element>(value_si: T, unit: U) -> T {
    if unit.is_si() {
        return value_si;
    }
    T::from_f64(unit.from_si(value_si.to_f64()))
}

/// Display adapter writing cells as `[a b c]`
pub(crate) struct Cells<'a, T>(pub(crate) &'a [T]);

impl<T: Element> fmt::Display for Cells<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cells(f, self.0)
    }
}

/// Write cells as `[a b c]`, honouring the formatter's precision
pub(crate) fn write_cells<T: Element>(f: &mut fmt::Formatter<'_>, cells: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in cells.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        match f.precision() {
            Some(p) => write!(f, "{v:.p$}")?,
            None => write!(f, "{v}")?,
        }
    }
    f.write_str("]")
}
