//! Vectors of unit-tagged values and their copy-on-write mutable wrapper

use super::{si_to_value, value_to_si, write_cells, Cells, Kind, KindFor, Relative, Scalar};
use crate::element::Element;
use crate::error::{Result, ValueError};
use crate::storage::{Shape, Storage, StorageType};
use crate::unit::Unit;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// An immutable vector of values of one quantity
///
/// Values are stored in SI; [`Self::unit`] only affects how they are
/// reported. Clones share the backing store.
///
/// # Usage
/// ```
/// use quantity_core::quantities::{LengthUnit, LengthVector};
/// use quantity_core::storage::StorageType;
///
/// let a = LengthVector::new(&[1.0, 2.0, 3.0], LengthUnit::Kilometer, StorageType::Dense).unwrap();
/// let b = LengthVector::new(&[0.0, 500.0, 0.0], LengthUnit::Meter, StorageType::Sparse).unwrap();
/// let sum = a.plus(&b).unwrap();
/// assert!(sum.is_sparse());
/// assert_eq!(sum.values_in_unit(LengthUnit::Kilometer), vec![1.0, 2.5, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Vector<U, K = Relative, T: Element = f64> {
    data: Arc<Storage<T>>,
    unit: U,
    kind: PhantomData<K>,
}

/// A vector that can be changed in place
///
/// Starts out sharing storage with the vector it came from; the first
/// write copies it. Read access goes through [`Deref`](std::ops::Deref) to
/// [`Vector`].
#[derive(Debug, Clone)]
pub struct MutableVector<U, K = Relative, T: Element = f64> {
    inner: Vector<U, K, T>,
}

impl_value_ops!(Vector, MutableVector);

// ============================================================================
// Construction
// ============================================================================

impl<U: Unit, K: KindFor<U>, T: Element> Vector<U, K, T> {
    /// Create a vector from values expressed in `unit`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyInput`] for an empty slice.
    pub fn new(values: &[T], unit: U, storage_type: StorageType) -> Result<Self> {
        let si = values.iter().map(|&v| value_to_si(v, unit)).collect();
        Self::from_si(si, unit, storage_type)
    }

    /// Create a vector from SI values, displayed in `unit`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyInput`] for an empty array.
    pub fn from_si(values: Vec<T>, unit: U, storage_type: StorageType) -> Result<Self> {
        if values.is_empty() {
            return Err(ValueError::EmptyInput("vector"));
        }
        let shape = Shape::vector(values.len());
        Ok(Self::wrap(Storage::from_values(values, shape, storage_type)?, unit))
    }

    /// Create a vector of `size` cells from (index, value) pairs; values are
    /// expressed in `unit` and every other cell is zero in SI.
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] when `size` is zero
    /// - a construction invariant error for unequal array lengths, duplicate
    ///   or out-of-range indices
    pub fn from_sparse_pairs(
        values: &[T],
        indices: Vec<usize>,
        size: usize,
        unit: U,
        storage_type: StorageType,
    ) -> Result<Self> {
        if size == 0 {
            return Err(ValueError::EmptyInput("vector"));
        }
        let si = values.iter().map(|&v| value_to_si(v, unit)).collect();
        let storage = Storage::from_pairs(si, indices, Shape::vector(size), storage_type)?;
        Ok(Self::wrap(storage, unit))
    }

    /// Create a vector from scalars, displayed in the first scalar's unit
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyInput`] for an empty slice.
    pub fn from_scalars(scalars: &[Scalar<U, K, T>], storage_type: StorageType) -> Result<Self> {
        let Some(first) = scalars.first() else {
            return Err(ValueError::EmptyInput("vector"));
        };
        let si = scalars.iter().map(Scalar::si_value).collect();
        Self::from_si(si, first.unit(), storage_type)
    }

    /// Wrap an existing SI store
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] for a zero-length store
    /// - [`ValueError::ShapeMismatch`] for a matrix-shaped store
    pub fn from_storage(storage: Storage<T>, unit: U) -> Result<Self> {
        match storage.shape() {
            Shape::Vector(0) => Err(ValueError::EmptyInput("vector")),
            Shape::Vector(_) => Ok(Self::wrap(storage, unit)),
            shape @ Shape::Matrix { .. } => Err(ValueError::ShapeMismatch {
                expected: Shape::vector(shape.len()),
                got: shape,
            }),
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Number of cells
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let size = self.size();
        if index >= size {
            return Err(ValueError::IndexOutOfRange { index, size });
        }
        Ok(())
    }

    /// Cell `index` as a scalar in the display unit
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `index >= size()`.
    pub fn get(&self, index: usize) -> Result<Scalar<U, K, T>> {
        Ok(Scalar::from_si(self.get_si(index)?, self.unit))
    }

    /// SI value of cell `index`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `index >= size()`.
    pub fn get_si(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.data.get(index))
    }

    /// Value of cell `index` expressed in `unit`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `index >= size()`.
    pub fn get_in_unit(&self, index: usize, unit: U) -> Result<T> {
        Ok(si_to_value(self.get_si(index)?, unit))
    }

    /// Every cell in SI, zeros included
    pub fn values_si(&self) -> Vec<T> {
        self.data.dense_values()
    }

    /// Every cell expressed in `unit`
    pub fn values_in_unit(&self, unit: U) -> Vec<T> {
        self.data
            .dense_values()
            .into_iter()
            .map(|si| si_to_value(si, unit))
            .collect()
    }

    /// Every cell as a scalar in the display unit
    pub fn to_scalars(&self) -> Vec<Scalar<U, K, T>> {
        self.data
            .dense_values()
            .into_iter()
            .map(|si| Scalar::from_si(si, self.unit))
            .collect()
    }

    fn describe(&self, mutable: bool, unit: U, verbose: bool) -> String {
        let cells = Cells(&self.values_in_unit(unit)).to_string();
        if !verbose {
            return format!("{cells} {unit}");
        }
        let access = if mutable { "Mutable" } else { "Immutable" };
        format!(
            "{access} {} {}Vector {cells} {unit}",
            self.storage_type(),
            K::NAME
        )
    }

    /// Render the values in `unit`; `verbose` prefixes mutability, storage
    /// type and kind
    pub fn format_in(&self, unit: U, verbose: bool) -> String {
        self.describe(false, unit, verbose)
    }
}

impl<U: Unit, K: Kind, T: Element> fmt::Display for Vector<U, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<T> = self
            .data
            .dense_values()
            .into_iter()
            .map(|si| si_to_value(si, self.unit))
            .collect();
        write_cells(f, &cells)?;
        write!(f, " {}", self.unit)
    }
}

// ============================================================================
// Mutation
// ============================================================================

impl<U: Unit, K: KindFor<U>, T: Element> MutableVector<U, K, T> {
    /// Overwrite cell `index` with a scalar
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `index >= size()`.
    pub fn set(&mut self, index: usize, value: Scalar<U, K, T>) -> Result<()> {
        self.set_si(index, value.si_value())
    }

    /// Overwrite cell `index` with an SI value
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `index >= size()`.
    pub fn set_si(&mut self, index: usize, value_si: T) -> Result<()> {
        self.inner.check_index(index)?;
        self.data_mut().set(index, value_si);
        Ok(())
    }

    /// Overwrite cell `index` with a value expressed in `unit`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `index >= size()`.
    pub fn set_in_unit(&mut self, index: usize, value: T, unit: U) -> Result<()> {
        self.set_si(index, value_to_si(value, unit))
    }

    /// Render the values in `unit`; `verbose` prefixes mutability, storage
    /// type and kind
    pub fn format_in(&self, unit: U, verbose: bool) -> String {
        self.inner.describe(true, unit, verbose)
    }
}

impl<U: Unit, K: Kind, T: Element> fmt::Display for MutableVector<U, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantities::{
        AbsoluteTemperatureUnit, AbsoluteTemperatureVector, DimensionlessUnit, DimensionlessVector,
        LengthUnit, LengthVector, MutableDimensionlessVector, MutableLengthVector, TemperatureUnit,
        TemperatureVector,
    };
    use approx::assert_relative_eq;

    fn ratios(values: &[f64]) -> DimensionlessVector {
        DimensionlessVector::new(values, DimensionlessUnit::Si, StorageType::Dense).unwrap()
    }

    fn km(values: &[f64], storage_type: StorageType) -> LengthVector {
        LengthVector::new(values, LengthUnit::Kilometer, storage_type).unwrap()
    }

    #[test]
    fn test_values_stored_in_si() {
        let v = km(&[1.0, 0.0, 2.5], StorageType::Dense);
        assert_eq!(v.values_si(), vec![1000.0, 0.0, 2500.0]);
        assert_eq!(v.values_in_unit(LengthUnit::Kilometer), vec![1.0, 0.0, 2.5]);
        assert_eq!(v.get_si(2).unwrap(), 2500.0);
        assert_eq!(v.get(0).unwrap().value(), 1.0);
        assert_eq!(v.get(0).unwrap().unit(), LengthUnit::Kilometer);
        assert_eq!(v.cardinality(), 2);
        assert_eq!(v.z_sum(), 3500.0);
    }

    #[test]
    fn test_empty_and_index_errors() {
        assert_eq!(
            LengthVector::new(&[], LengthUnit::Meter, StorageType::Dense).unwrap_err(),
            ValueError::EmptyInput("vector")
        );
        let v = km(&[1.0, 2.0], StorageType::Sparse);
        assert_eq!(
            v.get(2).unwrap_err(),
            ValueError::IndexOutOfRange { index: 2, size: 2 }
        );
    }

    #[test]
    fn test_sparse_pairs() {
        let v = LengthVector::from_sparse_pairs(
            &[3.0, 1.0],
            vec![4, 1],
            6,
            LengthUnit::Meter,
            StorageType::Sparse,
        )
        .unwrap();
        assert!(v.is_sparse());
        assert_eq!(v.values_si(), vec![0.0, 1.0, 0.0, 0.0, 3.0, 0.0]);

        let err = LengthVector::from_sparse_pairs(
            &[1.0, 2.0],
            vec![1, 1],
            3,
            LengthUnit::Meter,
            StorageType::Sparse,
        )
        .unwrap_err();
        assert!(err.is_construction_invariant());
    }

    #[test]
    fn test_from_storage_rejects_matrix_shape() {
        let storage = Storage::from_values(vec![1.0; 4], Shape::matrix(2, 2), StorageType::Dense)
            .unwrap();
        let err = LengthVector::from_storage(storage, LengthUnit::Meter).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn test_dense_sparse_promotion() {
        let dense = km(&[1.0, 2.0, 3.0], StorageType::Dense);
        let sparse = km(&[0.0, 1.0, 0.0], StorageType::Sparse);
        assert!(dense.plus(&dense).unwrap().is_dense());
        assert!(dense.plus(&sparse).unwrap().is_sparse());
        assert!(sparse.minus(&dense).unwrap().is_sparse());
        assert_eq!(
            sparse.minus(&dense).unwrap().values_in_unit(LengthUnit::Kilometer),
            vec![-1.0, -1.0, -3.0]
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let a = km(&[1.0, 2.0, 3.0], StorageType::Dense);
        let b = km(&[1.0, 2.0], StorageType::Dense);
        assert!(a.plus(&b).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_times_and_divide_by_dimensionless() {
        let v = km(&[1.0, 2.0], StorageType::Dense);
        let factors = ratios(&[2.0, 0.5]);
        assert_eq!(
            v.times(&factors).unwrap().values_in_unit(LengthUnit::Kilometer),
            vec![2.0, 1.0]
        );
        let ratio = v.divide(&km(&[0.5, 4.0], StorageType::Dense)).unwrap();
        assert_eq!(ratio.values_si(), vec![2.0, 0.5]);
        let err = v.divide(&km(&[1.0, 0.0], StorageType::Dense)).unwrap_err();
        assert_eq!(err, ValueError::DivisionByZero { index: 1 });
    }

    #[test]
    fn test_absolute_relative_arithmetic() {
        let temps = AbsoluteTemperatureVector::new(
            &[20.0, 25.0],
            AbsoluteTemperatureUnit::DegreeCelsius,
            StorageType::Dense,
        )
        .unwrap();
        let delta =
            TemperatureVector::new(&[1.0, 2.0], TemperatureUnit::Kelvin, StorageType::Dense)
                .unwrap();
        let warmer = temps.plus_rel(&delta).unwrap();
        assert_eq!(warmer.unit(), AbsoluteTemperatureUnit::DegreeCelsius);
        let in_c = warmer.values_in_unit(AbsoluteTemperatureUnit::DegreeCelsius);
        assert_relative_eq!(in_c[0], 21.0, epsilon = 1e-9);
        assert_relative_eq!(in_c[1], 27.0, epsilon = 1e-9);

        let difference = warmer.minus_abs(&temps).unwrap();
        assert_eq!(difference.unit(), TemperatureUnit::DegreeCelsius);
        assert_relative_eq!(difference.values_si()[1], 2.0, epsilon = 1e-9);

        let back = delta.plus_abs(&temps).unwrap();
        assert_eq!(back.unit(), AbsoluteTemperatureUnit::DegreeCelsius);
        assert_eq!(back, warmer);
    }

    #[test]
    fn test_to_dense_shares_when_already_dense() {
        let v = km(&[1.0, 0.0], StorageType::Dense);
        assert!(v.to_dense().shares_storage(&v));
        let s = v.to_sparse();
        assert!(!s.shares_storage(&v));
        assert!(s.to_sparse().shares_storage(&s));
        assert_eq!(s, v);
    }

    #[test]
    fn test_copy_on_write() {
        let original = km(&[1.0, 2.0, 3.0], StorageType::Dense);
        let mut m = original.mutable();
        assert!(m.shares_storage(&original));
        m.set_in_unit(0, 9.0, LengthUnit::Kilometer).unwrap();
        assert!(!m.shares_storage(&original));
        assert_eq!(original.get_si(0).unwrap(), 1000.0);
        assert_eq!(m.get_si(0).unwrap(), 9000.0);

        let snapshot = m.immutable();
        m.multiply_by(2.0);
        assert_eq!(snapshot.get_si(0).unwrap(), 9000.0);
        assert_eq!(m.get_si(0).unwrap(), 18000.0);
    }

    #[test]
    fn test_failed_update_leaves_wrapper_unchanged() {
        let mut m: MutableLengthVector = km(&[1.0, 2.0], StorageType::Dense).mutable();
        let err = m.increment_by(&km(&[1.0], StorageType::Dense)).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert_eq!(m.values_si(), vec![1000.0, 2000.0]);
        assert_eq!(m.divide_by(0.0).unwrap_err(), ValueError::DivisionByZero { index: 0 });
        let zeros = ratios(&[1.0, 0.0]);
        assert!(m.divide_by_elements(&zeros).is_err());
        assert_eq!(m.values_si(), vec![1000.0, 2000.0]);
    }

    #[test]
    fn test_in_place_keeps_storage_type() {
        let mut m = km(&[0.0, 1.0, 0.0], StorageType::Sparse).mutable();
        m.increment_by(&km(&[1.0, 1.0, 1.0], StorageType::Dense)).unwrap();
        assert!(m.is_sparse());
        assert_eq!(m.values_in_unit(LengthUnit::Kilometer), vec![1.0, 2.0, 1.0]);
        m.densify();
        assert!(m.is_dense());
        m.sparsify();
        assert!(m.is_sparse());
    }

    #[test]
    fn test_normalize() {
        let mut m = LengthVector::new(&[1.0, 3.0], LengthUnit::Meter, StorageType::Dense)
            .unwrap()
            .mutable();
        m.normalize().unwrap();
        assert_eq!(m.values_si(), vec![0.25, 0.75]);

        let mut zero_sum = LengthVector::new(&[1.0, -1.0], LengthUnit::Meter, StorageType::Sparse)
            .unwrap()
            .mutable();
        assert_eq!(zero_sum.normalize().unwrap_err(), ValueError::NormalizeZeroSum);
        assert_eq!(zero_sum.values_si(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_rounding_applies_to_si_values() {
        let si = |values: Vec<f64>| {
            LengthVector::from_si(values, LengthUnit::Kilometer, StorageType::Dense).unwrap()
        };
        let mut m = si(vec![1.4, -2.5, 2.5]).mutable();
        m.rint();
        assert_eq!(m.values_si(), vec![1.0, -2.0, 2.0]);
        assert_eq!(m.unit(), LengthUnit::Kilometer);

        let mut m = si(vec![1.4, -2.5]).mutable();
        m.round();
        assert_eq!(m.values_si(), vec![1.0, -3.0]);
        m.abs().neg();
        assert_eq!(m.values_si(), vec![-1.0, -3.0]);

        let mut m = si(vec![0.2, -0.2]).mutable();
        m.ceil();
        assert_eq!(m.values_si(), vec![1.0, -0.0]);
        m.floor();
        assert_eq!(m.values_si(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_absolute_mutable_shift() {
        let start = AbsoluteTemperatureVector::new(
            &[0.0, 10.0],
            AbsoluteTemperatureUnit::DegreeCelsius,
            StorageType::Dense,
        )
        .unwrap();
        let mut m = start.mutable();
        m.increment_by_scalar(crate::quantities::Temperature::new(
            5.0,
            TemperatureUnit::DegreeCelsius,
        ));
        let values = m.values_in_unit(AbsoluteTemperatureUnit::DegreeCelsius);
        assert_relative_eq!(values[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dimensionless_functions() {
        let mut m: MutableDimensionlessVector = ratios(&[4.0, 9.0]).mutable();
        m.sqrt();
        assert_eq!(m.values_si(), vec![2.0, 3.0]);
        m.pow(2.0);
        assert_eq!(m.values_si(), vec![4.0, 9.0]);
        m.ln().exp();
        assert_relative_eq!(m.values_si()[1], 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        let v = km(&[1.0, 0.0, 2.5], StorageType::Sparse);
        assert_eq!(v.to_string(), "[1 0 2.5] km");
        assert_eq!(format!("{:.1}", v), "[1.0 0.0 2.5] km");
        assert_eq!(
            v.format_in(LengthUnit::Meter, true),
            "Immutable Sparse RelVector [1000 0 2500] m"
        );
        assert_eq!(
            v.mutable().format_in(LengthUnit::Kilometer, true),
            "Mutable Sparse RelVector [1 0 2.5] km"
        );
    }
}
