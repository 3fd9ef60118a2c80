//! Dense and sparse backing stores for vectors and matrices
//!
//! Storage holds SI values only; the unit lives in the enclosing value type.
//! Cells are addressed by a linear index, row-major for matrices
//! (`row * cols + col`).
//!
//! - [`DenseData`]: every cell stored, O(1) access
//! - [`SparseData`]: non-zero cells only, index-ascending, binary search access
//! - [`Storage`]: either of the two, the handle value types share
//! - [`ops`]: elementwise arithmetic with storage-type promotion, determinant

pub mod dense;
pub mod ops;
pub mod sparse;

pub use dense::DenseData;
pub use sparse::SparseData;

use crate::element::Element;
use crate::error::{Result, ValueError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical representation of a vector or matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    /// Every cell stored, including zeros
    Dense,
    /// Only non-zero cells stored as (index, value) pairs
    Sparse,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Dense => write!(f, "Dense"),
            StorageType::Sparse => write!(f, "Sparse"),
        }
    }
}

/// Fixed shape of a storage object; never changes after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// One-dimensional, `len` cells
    Vector(usize),
    /// Two-dimensional, row-major
    Matrix {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },
}

impl Shape {
    /// Vector shape of `len` cells
    #[inline]
    pub const fn vector(len: usize) -> Self {
        Shape::Vector(len)
    }

    /// Matrix shape of `rows x cols` cells
    #[inline]
    pub const fn matrix(rows: usize, cols: usize) -> Self {
        Shape::Matrix { rows, cols }
    }

    /// Total number of logical cells; stores only hold shapes that passed [`Self::try_len`]
    #[inline]
    pub const fn len(&self) -> usize {
        match *self {
            Shape::Vector(len) => len,
            Shape::Matrix { rows, cols } => rows * cols,
        }
    }

    /// Total number of logical cells, checked for overflow
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ShapeOverflow`] when `rows * cols` exceeds `usize`.
    pub fn try_len(&self) -> Result<usize> {
        match *self {
            Shape::Vector(len) => Ok(len),
            Shape::Matrix { rows, cols } => rows
                .checked_mul(cols)
                .ok_or(ValueError::ShapeOverflow { rows, cols }),
        }
    }

    /// Matrix shape of `rows x cols` cells whose cell count fits in `usize`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ShapeOverflow`] when `rows * cols` exceeds `usize`.
    pub fn try_matrix(rows: usize, cols: usize) -> Result<Self> {
        let shape = Shape::matrix(rows, cols);
        shape.try_len()?;
        Ok(shape)
    }

    /// Whether the shape has no cells
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows (a vector is a single row)
    #[inline]
    pub const fn rows(&self) -> usize {
        match *self {
            Shape::Vector(_) => 1,
            Shape::Matrix { rows, .. } => rows,
        }
    }

    /// Number of columns (a vector has one column per cell)
    #[inline]
    pub const fn cols(&self) -> usize {
        match *self {
            Shape::Vector(len) => len,
            Shape::Matrix { cols, .. } => cols,
        }
    }

    /// Linear row-major index of `(row, col)`
    #[inline]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    /// Whether the shape is a matrix with as many rows as columns
    #[inline]
    pub const fn is_square(&self) -> bool {
        match *self {
            Shape::Vector(_) => false,
            Shape::Matrix { rows, cols } => rows == cols,
        }
    }

    /// Fail with [`ValueError::ShapeMismatch`] unless `other` equals `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn check_same(&self, other: &Shape) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(ValueError::ShapeMismatch {
                expected: *self,
                got: *other,
            })
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Vector(len) => write!(f, "{len}"),
            Shape::Matrix { rows, cols } => write!(f, "{rows} x {cols}"),
        }
    }
}

/// A dense or sparse store, the unit-free backing of every vector and matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Storage<T: Element> {
    /// Every cell stored
    Dense(DenseData<T>),
    /// Non-zero cells stored
    Sparse(SparseData<T>),
}

impl<T: Element> Storage<T> {
    /// Build a store of the requested kind from a flat SI array.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ShapeMismatch`] when `values.len()` differs
    /// from `shape.len()`.
    pub fn from_values(values: Vec<T>, shape: Shape, storage_type: StorageType) -> Result<Self> {
        let dense = DenseData::new(values, shape)?;
        Ok(match storage_type {
            StorageType::Dense => Storage::Dense(dense),
            StorageType::Sparse => Storage::Sparse(dense.to_sparse()),
        })
    }

    /// Build a store of the requested kind from (index, value) pairs.
    ///
    /// # Errors
    ///
    /// Returns a construction invariant error for mismatched array lengths,
    /// duplicate or out-of-range indices.
    pub fn from_pairs(
        values: Vec<T>,
        indices: Vec<usize>,
        shape: Shape,
        storage_type: StorageType,
    ) -> Result<Self> {
        let sparse = SparseData::new(values, indices, shape)?;
        Ok(match storage_type {
            StorageType::Dense => Storage::Dense(sparse.to_dense()),
            StorageType::Sparse => Storage::Sparse(sparse),
        })
    }

    /// Representation of this store
    #[inline]
    pub fn storage_type(&self) -> StorageType {
        match self {
            Storage::Dense(_) => StorageType::Dense,
            Storage::Sparse(_) => StorageType::Sparse,
        }
    }

    /// Shape of this store
    #[inline]
    pub fn shape(&self) -> Shape {
        match self {
            Storage::Dense(d) => d.shape(),
            Storage::Sparse(s) => s.shape(),
        }
    }

    /// Total number of logical cells
    #[inline]
    pub fn len(&self) -> usize {
        self.shape().len()
    }

    /// Whether the store has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SI value at a linear index. Unchecked: callers validate bounds.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        match self {
            Storage::Dense(d) => d.get(index),
            Storage::Sparse(s) => s.get(index),
        }
    }

    /// SI value at `(row, col)`. Unchecked: callers validate bounds.
    #[inline]
    pub fn get_at(&self, row: usize, col: usize) -> T {
        self.get(self.shape().index(row, col))
    }

    /// Overwrite the SI value at a linear index
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        match self {
            Storage::Dense(d) => d.set(index, value),
            Storage::Sparse(s) => s.set(index, value),
        }
    }

    /// Overwrite the SI value at `(row, col)`
    #[inline]
    pub fn set_at(&mut self, row: usize, col: usize, value: T) {
        let index = self.shape().index(row, col);
        self.set(index, value);
    }

    /// Number of non-zero cells
    pub fn cardinality(&self) -> usize {
        match self {
            Storage::Dense(d) => d.cardinality(),
            Storage::Sparse(s) => s.cardinality(),
        }
    }

    /// Sum of all SI values
    pub fn z_sum(&self) -> T {
        match self {
            Storage::Dense(d) => d.z_sum(),
            Storage::Sparse(s) => s.z_sum(),
        }
    }

    /// Fully materialized SI values, row-major
    pub fn dense_values(&self) -> Vec<T> {
        match self {
            Storage::Dense(d) => d.values().to_vec(),
            Storage::Sparse(s) => s.to_dense().into_values(),
        }
    }

    /// Dense copy of this store (a plain clone when already dense)
    pub fn to_dense(&self) -> Storage<T> {
        match self {
            Storage::Dense(_) => self.clone(),
            Storage::Sparse(s) => Storage::Dense(s.to_dense()),
        }
    }

    /// Sparse copy of this store (a plain clone when already sparse)
    pub fn to_sparse(&self) -> Storage<T> {
        match self {
            Storage::Dense(d) => Storage::Sparse(d.to_sparse()),
            Storage::Sparse(_) => self.clone(),
        }
    }

    /// Convert to the dense representation, consuming the store
    pub fn into_dense(self) -> Storage<T> {
        match self {
            Storage::Dense(_) => self,
            Storage::Sparse(s) => Storage::Dense(s.to_dense()),
        }
    }

    /// Convert to the sparse representation, consuming the store
    pub fn into_sparse(self) -> Storage<T> {
        match self {
            Storage::Dense(d) => Storage::Sparse(d.to_sparse()),
            Storage::Sparse(_) => self,
        }
    }

    /// Convert to `storage_type`, consuming the store
    pub fn into_storage_type(self, storage_type: StorageType) -> Storage<T> {
        match storage_type {
            StorageType::Dense => self.into_dense(),
            StorageType::Sparse => self.into_sparse(),
        }
    }

    /// Apply `f` to every cell in place
    pub fn assign<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Send + Sync,
    {
        match self {
            Storage::Dense(d) => d.assign(f),
            Storage::Sparse(s) => s.assign(f),
        }
    }

    /// Add `value` to every cell
    pub fn increment_by(&mut self, value: T) {
        match self {
            Storage::Dense(d) => d.increment_by(value),
            Storage::Sparse(s) => s.increment_by(value),
        }
    }

    /// Subtract `value` from every cell
    pub fn decrement_by(&mut self, value: T) {
        match self {
            Storage::Dense(d) => d.decrement_by(value),
            Storage::Sparse(s) => s.decrement_by(value),
        }
    }

    /// Multiply every cell by `factor`
    pub fn multiply_by(&mut self, factor: T) {
        match self {
            Storage::Dense(d) => d.multiply_by(factor),
            Storage::Sparse(s) => s.multiply_by(factor),
        }
    }

    /// Divide every cell by `divisor`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::DivisionByZero`] (index 0) when `divisor` is
    /// zero; the store is left unchanged.
    pub fn divide_by(&mut self, divisor: T) -> Result<()> {
        if divisor.is_zero() {
            tracing::debug!("Rejected division of {} cells by zero", self.len());
            return Err(ValueError::DivisionByZero { index: 0 });
        }
        match self {
            Storage::Dense(d) => d.divide_by(divisor),
            Storage::Sparse(s) => s.divide_by(divisor),
        }
        Ok(())
    }

    /// Scale every cell so the values sum to one.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NormalizeZeroSum`] when the sum is exactly zero;
    /// the store is left unchanged.
    pub fn normalize(&mut self) -> Result<()> {
        let sum = self.z_sum();
        if sum.is_zero() {
            tracing::debug!("Rejected normalize of {} cells with zero sum", self.len());
            return Err(ValueError::NormalizeZeroSum);
        }
        self.divide_by(sum)
    }
}

impl<T: Element> PartialEq for Storage<T> {
    /// Cell-for-cell equality; dense and sparse stores with the same cells are equal.
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        match (self, other) {
            (Storage::Dense(a), Storage::Dense(b)) => a.values() == b.values(),
            (Storage::Sparse(a), Storage::Sparse(b)) => {
                a.indices() == b.indices() && a.values() == b.values()
            }
            _ => (0..self.len()).all(|i| self.get(i) == other.get(i)),
        }
    }
}

impl<T: Element> From<DenseData<T>> for Storage<T> {
    fn from(data: DenseData<T>) -> Self {
        Storage::Dense(data)
    }
}

impl<T: Element> From<SparseData<T>> for Storage<T> {
    fn from(data: SparseData<T>) -> Self {
        Storage::Sparse(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_linear_index() {
        let shape = Shape::matrix(3, 4);
        assert_eq!(shape.len(), 12);
        assert_eq!(shape.index(2, 1), 9);
        assert!(!shape.is_square());
        assert!(Shape::matrix(2, 2).is_square());
        assert_eq!(Shape::vector(5).rows(), 1);
        assert_eq!(Shape::vector(5).cols(), 5);
    }

    #[test]
    fn test_shape_overflow_is_an_error() {
        assert_eq!(Shape::try_matrix(3, 4).unwrap().try_len().unwrap(), 12);
        assert_eq!(
            Shape::try_matrix(usize::MAX, 2).unwrap_err(),
            ValueError::ShapeOverflow {
                rows: usize::MAX,
                cols: 2
            }
        );
    }

    #[test]
    fn test_deserialize_rejects_invalid_store() {
        let bad = r#"{"Sparse":{"indices":[5],"values":[1.0],"shape":{"Vector":2}}}"#;
        assert!(serde_json::from_str::<Storage<f64>>(bad).is_err());

        let good = r#"{"Dense":{"values":[0.0,2.0],"shape":{"Vector":2}}}"#;
        let s: Storage<f64> = serde_json::from_str(good).unwrap();
        assert_eq!(s.get(1), 2.0);
        assert_eq!(s.storage_type(), StorageType::Dense);
    }

    #[test]
    fn test_check_same_reports_both_shapes() {
        let err = Shape::vector(3).check_same(&Shape::vector(4)).unwrap_err();
        assert_eq!(
            err,
            ValueError::ShapeMismatch {
                expected: Shape::vector(3),
                got: Shape::vector(4)
            }
        );
    }

    #[test]
    fn test_from_values_sparse_drops_zeros() {
        let s = Storage::from_values(vec![0.0, 5.0, 0.0], Shape::vector(3), StorageType::Sparse)
            .unwrap();
        assert_eq!(s.storage_type(), StorageType::Sparse);
        assert_eq!(s.cardinality(), 1);
        assert_eq!(s.dense_values(), vec![0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_dense_equals_sparse_with_same_cells() {
        let dense = Storage::from_values(vec![1.0, 0.0, 2.0], Shape::vector(3), StorageType::Dense)
            .unwrap();
        let sparse = dense.to_sparse();
        assert_eq!(dense, sparse);
        let mut other = sparse.clone();
        other.set(1, 4.0);
        assert_ne!(dense, other);
    }

    #[test]
    fn test_divide_by_zero_leaves_store_untouched() {
        let mut s = Storage::from_values(vec![1.0, 2.0], Shape::vector(2), StorageType::Dense)
            .unwrap();
        assert_eq!(s.divide_by(0.0), Err(ValueError::DivisionByZero { index: 0 }));
        assert_eq!(s.dense_values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_normalize() {
        let values = vec![1.0, 3.0, 0.0, 4.0];
        let mut s = Storage::from_values(values, Shape::matrix(2, 2), StorageType::Sparse).unwrap();
        s.normalize().unwrap();
        assert_eq!(s.dense_values(), vec![0.125, 0.375, 0.0, 0.5]);
        assert_eq!(s.storage_type(), StorageType::Sparse);

        let mut zero = Storage::from_values(vec![1.0, -1.0], Shape::vector(2), StorageType::Dense)
            .unwrap();
        assert_eq!(zero.normalize(), Err(ValueError::NormalizeZeroSum));
        assert_eq!(zero.dense_values(), vec![1.0, -1.0]);
    }
}
