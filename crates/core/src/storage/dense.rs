//! Dense storage: every cell stored in a flat row-major array

use super::{Shape, SparseData};
use crate::element::Element;
use crate::error::{Result, ValueError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Dense SI data for a vector or matrix
///
/// Stores every logical cell, explicit zeros included, as a flat `Vec<T>`
/// in row-major order (`row * cols + col`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDenseData<T>", bound = "")]
pub struct DenseData<T: Element> {
    /// Cell values in row-major order
    values: Vec<T>,
    /// Logical shape; `values.len() == shape.len()`
    shape: Shape,
}

impl<T: Element> DenseData<T> {
    /// Wrap a flat SI array
    ///
    /// # Errors
    ///
    /// - [`ValueError::ShapeMismatch`] when `values.len()` differs from `shape.len()`
    /// - [`ValueError::ShapeOverflow`] when the shape has more cells than `usize` can count
    pub fn new(values: Vec<T>, shape: Shape) -> Result<Self> {
        if values.len() != shape.try_len()? {
            return Err(ValueError::ShapeMismatch {
                expected: shape,
                got: Shape::vector(values.len()),
            });
        }
        Ok(Self { values, shape })
    }

    /// All-zero store of the given shape
    #[must_use]
    pub fn zeros(shape: Shape) -> Self {
        Self {
            values: vec![T::ZERO; shape.len()],
            shape,
        }
    }

    /// Build a matrix store from rows of SI values
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] when there are no rows or the rows are empty
    /// - [`ValueError::RaggedInput`] when a row length differs from the first row
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = check_rectangular(rows)?;
        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            values.extend_from_slice(row.as_ref());
        }
        Ok(Self {
            values,
            shape: Shape::matrix(rows.len(), cols),
        })
    }

    /// Logical shape
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of logical cells
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cell values in row-major order
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Consume the store and return its values
    #[inline]
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Value at a linear index
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`; bounds are checked by the value types.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        self.values[index]
    }

    /// Value at `(row, col)`
    #[inline]
    pub fn get_at(&self, row: usize, col: usize) -> T {
        self.values[self.shape.index(row, col)]
    }

    /// Overwrite the value at a linear index
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        self.values[index] = value;
    }

    /// Overwrite the value at `(row, col)`
    #[inline]
    pub fn set_at(&mut self, row: usize, col: usize, value: T) {
        let index = self.shape.index(row, col);
        self.values[index] = value;
    }

    /// Values as rows (a vector yields a single row)
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.values
            .chunks(self.shape.cols().max(1))
            .map(<[T]>::to_vec)
            .collect()
    }

    /// Number of non-zero cells
    pub fn cardinality(&self) -> usize {
        self.values.par_iter().filter(|v| !v.is_zero()).count()
    }

    /// Sum of all cells
    pub fn z_sum(&self) -> T {
        self.values.iter().fold(T::ZERO, |acc, &v| acc + v)
    }

    /// Sparse copy holding every non-zero cell in ascending index order
    pub fn to_sparse(&self) -> SparseData<T> {
        let (indices, values): (Vec<usize>, Vec<T>) = self
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_zero())
            .map(|(i, &v)| (i, v))
            .unzip();
        tracing::trace!(
            cells = self.values.len(),
            non_zero = values.len(),
            "Dense -> sparse"
        );
        SparseData::from_sorted_parts(values, indices, self.shape)
    }

    /// Apply `f` to every cell in place, in parallel
    pub fn assign<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Send + Sync,
    {
        self.values.par_iter_mut().for_each(|v| *v = f(*v));
    }

    /// Add `value` to every cell
    pub fn increment_by(&mut self, value: T) {
        self.values.par_iter_mut().for_each(|v| *v += value);
    }

    /// Subtract `value` from every cell
    pub fn decrement_by(&mut self, value: T) {
        self.values.par_iter_mut().for_each(|v| *v -= value);
    }

    /// Multiply every cell by `factor`
    pub fn multiply_by(&mut self, factor: T) {
        self.values.par_iter_mut().for_each(|v| *v *= factor);
    }

    /// Combine with a same-shaped store cell by cell, in parallel.
    /// Shapes are checked by the caller.
    pub(crate) fn zip_assign<F>(&mut self, other: &DenseData<T>, f: F)
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        debug_assert_eq!(self.shape, other.shape);
        self.values
            .par_iter_mut()
            .zip(other.values.par_iter())
            .for_each(|(x, &y)| *x = f(*x, y));
    }

    /// Divide every cell by `divisor` (zero is rejected by [`super::Storage::divide_by`])
    pub fn divide_by(&mut self, divisor: T) {
        self.values.par_iter_mut().for_each(|v| *v /= divisor);
    }
}

/// Unchecked wire form; deserialized stores go through [`DenseData::new`]
#[derive(Deserialize)]
#[serde(bound = "")]
struct RawDenseData<T: Element> {
    values: Vec<T>,
    shape: Shape,
}

impl<T: Element> TryFrom<RawDenseData<T>> for DenseData<T> {
    type Error = ValueError;

    fn try_from(raw: RawDenseData<T>) -> Result<Self> {
        Self::new(raw.values, raw.shape)
    }
}

/// Validate that `rows` is non-empty and rectangular, returning the column count
pub(crate) fn check_rectangular<E, R: AsRef<[E]>>(rows: &[R]) -> Result<usize> {
    let Some(first) = rows.first() else {
        return Err(ValueError::EmptyInput("matrix"));
    };
    let cols = first.as_ref().len();
    if cols == 0 {
        return Err(ValueError::EmptyInput("matrix"));
    }
    for (row, values) in rows.iter().enumerate() {
        let got = values.as_ref().len();
        if got != cols {
            return Err(ValueError::RaggedInput {
                row,
                expected: cols,
                got,
            });
        }
    }
    Ok(cols)
}
