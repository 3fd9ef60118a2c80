//! Sparse storage: non-zero cells only, as index-ascending (index, value) pairs

use super::{DenseData, Shape};
use crate::element::Element;
use crate::error::{Result, ValueError};
use serde::{Deserialize, Serialize};

/// Sparse SI data for a vector or matrix
///
/// Invariants:
/// - `indices` strictly increasing, every index `< shape.len()`
/// - `values.len() == indices.len()`
/// - no stored value is exactly zero, so `cardinality()` is the number of
///   stored pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSparseData<T>", bound = "")]
pub struct SparseData<T: Element> {
    /// Linear row-major indices of the stored cells
    indices: Vec<usize>,
    /// Values of the stored cells, parallel to `indices`
    values: Vec<T>,
    /// Logical shape
    shape: Shape,
}

impl<T: Element> SparseData<T> {
    /// Build from (value, index) pairs in any order.
    ///
    /// Pairs whose value is zero are dropped. The pairs are sorted once here
    /// so lookups can binary search.
    ///
    /// # Errors
    ///
    /// - [`ValueError::SparseLengthMismatch`] when the arrays differ in length
    /// - [`ValueError::InvalidSparseIndex`] for an index outside `[0, shape.len())`
    /// - [`ValueError::DuplicateSparseIndex`] for an index given twice
    /// - [`ValueError::ShapeOverflow`] when the shape has more cells than `usize` can count
    pub fn new(values: Vec<T>, indices: Vec<usize>, shape: Shape) -> Result<Self> {
        let size = shape.try_len()?;
        if values.len() != indices.len() {
            return Err(ValueError::SparseLengthMismatch {
                values: values.len(),
                indices: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= size) {
            return Err(ValueError::InvalidSparseIndex { index, size });
        }

        let mut pairs: Vec<(usize, T)> = indices.into_iter().zip(values).collect();
        pairs.sort_unstable_by_key(|&(i, _)| i);
        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ValueError::DuplicateSparseIndex { index: w[0].0 });
        }

        let (indices, values) = pairs.into_iter().filter(|(_, v)| !v.is_zero()).unzip();
        Ok(Self {
            indices,
            values,
            shape,
        })
    }

    /// Store with no non-zero cells
    #[must_use]
    pub fn empty(shape: Shape) -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
            shape,
        }
    }

    /// Build from parts that already satisfy the invariants
    /// (ascending unique in-range indices, no zero values).
    pub(crate) fn from_sorted_parts(values: Vec<T>, indices: Vec<usize>, shape: Shape) -> Self {
        debug_assert_eq!(values.len(), indices.len());
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(values.iter().all(|v| !v.is_zero()));
        Self {
            indices,
            values,
            shape,
        }
    }

    /// Collect the non-zero cells of `(index, value)` items already in ascending index order
    pub(crate) fn collect_sorted<I>(cells: I, shape: Shape) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let (indices, values) = cells.into_iter().filter(|(_, v)| !v.is_zero()).unzip();
        Self::from_sorted_parts(values, indices, shape)
    }

    /// Logical shape
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of logical cells (zeros included)
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// Whether the shape has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Number of stored (non-zero) cells
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }

    /// Stored indices, ascending
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, parallel to [`Self::indices`]
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate the stored `(index, value)` pairs in ascending index order
    pub fn iter_non_zero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at a linear index; absent cells are zero
    #[inline]
    pub fn get(&self, index: usize) -> T {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => T::ZERO,
        }
    }

    /// Value at `(row, col)`
    #[inline]
    pub fn get_at(&self, row: usize, col: usize) -> T {
        self.get(self.shape.index(row, col))
    }

    /// Overwrite the value at a linear index.
    ///
    /// Writing zero removes the cell; writing a non-zero value into an
    /// absent cell inserts it in index order.
    pub fn set(&mut self, index: usize, value: T) {
        match (self.indices.binary_search(&index), value.is_zero()) {
            (Ok(pos), true) => {
                self.indices.remove(pos);
                self.values.remove(pos);
            }
            (Ok(pos), false) => self.values[pos] = value,
            (Err(_), true) => {}
            (Err(pos), false) => {
                self.indices.insert(pos, index);
                self.values.insert(pos, value);
            }
        }
    }

    /// Overwrite the value at `(row, col)`
    #[inline]
    pub fn set_at(&mut self, row: usize, col: usize, value: T) {
        let index = self.shape.index(row, col);
        self.set(index, value);
    }

    /// Sum of all cells
    pub fn z_sum(&self) -> T {
        self.values.iter().fold(T::ZERO, |acc, &v| acc + v)
    }

    /// Dense copy: zero-filled array with every stored pair scattered in
    pub fn to_dense(&self) -> DenseData<T> {
        let mut dense = DenseData::zeros(self.shape);
        for (index, value) in self.iter_non_zero() {
            dense.set(index, value);
        }
        tracing::trace!(
            cells = self.shape.len(),
            non_zero = self.values.len(),
            "Sparse -> dense"
        );
        dense
    }

    /// Apply `f` to every logical cell in place.
    ///
    /// When `f(0) == 0` only stored cells are visited; otherwise every cell
    /// changes, so the data is densified, transformed and sparsified again.
    pub fn assign<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Send + Sync,
    {
        if f(T::ZERO).is_zero() {
            for v in &mut self.values {
                *v = f(*v);
            }
            self.compact();
        } else {
            let mut dense = self.to_dense();
            dense.assign(f);
            *self = dense.to_sparse();
        }
    }

    /// Add `value` to every cell
    pub fn increment_by(&mut self, value: T) {
        self.assign(|v| v + value);
    }

    /// Subtract `value` from every cell
    pub fn decrement_by(&mut self, value: T) {
        self.assign(|v| v - value);
    }

    /// Multiply every cell by `factor`
    pub fn multiply_by(&mut self, factor: T) {
        self.assign(|v| v * factor);
    }

    /// Divide every cell by a non-zero `divisor`
    pub fn divide_by(&mut self, divisor: T) {
        self.assign(|v| v / divisor);
    }

    /// Drop stored cells that became zero
    fn compact(&mut self) {
        if self.values.iter().all(|v| !v.is_zero()) {
            return;
        }
        let (indices, values) = self
            .iter_non_zero()
            .filter(|(_, v)| !v.is_zero())
            .unzip();
        self.indices = indices;
        self.values = values;
    }
}

/// Unchecked wire form; deserialized stores go through [`SparseData::new`]
#[derive(Deserialize)]
#[serde(bound = "")]
struct RawSparseData<T: Element> {
    indices: Vec<usize>,
    values: Vec<T>,
    shape: Shape,
}

impl<T: Element> TryFrom<RawSparseData<T>> for SparseData<T> {
    type Error = ValueError;

    fn try_from(raw: RawSparseData<T>) -> Result<Self> {
        Self::new(raw.values, raw.indices, raw.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseData<f64> {
        SparseData::new(vec![3.0, 1.0, 2.0], vec![7, 0, 4], Shape::matrix(3, 3)).unwrap()
    }

    #[test]
    fn test_new_sorts_pairs() {
        let s = sample();
        assert_eq!(s.indices(), &[0, 4, 7]);
        assert_eq!(s.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(s.get_at(2, 1), 3.0);
        assert_eq!(s.get_at(1, 1), 2.0);
        assert_eq!(s.get(5), 0.0);
    }

    #[test]
    fn test_new_drops_explicit_zeros() {
        let s = SparseData::new(vec![0.0, 2.0], vec![1, 3], Shape::vector(4)).unwrap();
        assert_eq!(s.cardinality(), 1);
        assert_eq!(s.indices(), &[3]);
    }

    #[test]
    fn test_new_rejects_invalid_input() {
        assert_eq!(
            SparseData::new(vec![1.0], vec![4], Shape::vector(4)).unwrap_err(),
            ValueError::InvalidSparseIndex { index: 4, size: 4 }
        );
        assert_eq!(
            SparseData::new(vec![1.0, 2.0], vec![2, 2], Shape::vector(4)).unwrap_err(),
            ValueError::DuplicateSparseIndex { index: 2 }
        );
        assert_eq!(
            SparseData::new(vec![1.0, 2.0], vec![2], Shape::vector(4)).unwrap_err(),
            ValueError::SparseLengthMismatch {
                values: 2,
                indices: 1
            }
        );
    }

    #[test]
    fn test_set_maintains_cardinality() {
        let mut s = sample();
        s.set(5, 9.0);
        assert_eq!(s.indices(), &[0, 4, 5, 7]);
        assert_eq!(s.cardinality(), 4);

        s.set(4, 0.0);
        assert_eq!(s.indices(), &[0, 5, 7]);
        assert_eq!(s.cardinality(), 3);

        s.set(8, 0.0);
        assert_eq!(s.cardinality(), 3);

        s.set(0, -1.0);
        assert_eq!(s.get(0), -1.0);
        assert_eq!(s.cardinality(), 3);
    }

    #[test]
    fn test_to_dense_scatters_pairs() {
        let d = sample().to_dense();
        assert_eq!(d.values(), &[1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0, 0.0]);
        assert_eq!(d.to_sparse(), sample());
    }

    #[test]
    fn test_assign_zero_preserving() {
        let mut s = sample();
        s.assign(|v| if v < 2.5 { 0.0 } else { v * 10.0 });
        assert_eq!(s.indices(), &[7]);
        assert_eq!(s.values(), &[30.0]);
    }

    #[test]
    fn test_increment_fills_every_cell() {
        let mut s = SparseData::new(vec![1.0], vec![1], Shape::vector(3)).unwrap();
        s.increment_by(1.0);
        assert_eq!(s.cardinality(), 3);
        assert_eq!(s.to_dense().values(), &[1.0, 2.0, 1.0]);
        s.decrement_by(1.0);
        assert_eq!(s.indices(), &[1]);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let out_of_range = r#"{"indices":[9,1,1],"values":[1.0,0.0,2.0],"shape":{"Vector":2}}"#;
        assert!(serde_json::from_str::<SparseData<f64>>(out_of_range).is_err());

        let duplicate = r#"{"indices":[1,1],"values":[1.0,2.0],"shape":{"Vector":4}}"#;
        assert!(serde_json::from_str::<SparseData<f64>>(duplicate).is_err());

        let uneven = r#"{"indices":[0],"values":[1.0,2.0],"shape":{"Vector":4}}"#;
        assert!(serde_json::from_str::<SparseData<f64>>(uneven).is_err());

        let unsorted = r#"{"indices":[3,0,2],"values":[4.0,0.0,1.0],"shape":{"Vector":4}}"#;
        let s: SparseData<f64> = serde_json::from_str(unsorted).unwrap();
        assert_eq!(s.indices(), &[2, 3]);
        assert_eq!(s.values(), &[1.0, 4.0]);
    }

    #[test]
    fn test_copy_is_independent() {
        let s = sample();
        let mut copy = s.clone();
        copy.set(0, 0.0);
        assert_eq!(s.get(0), 1.0);
        assert_eq!(copy.get(0), 0.0);
    }
}
