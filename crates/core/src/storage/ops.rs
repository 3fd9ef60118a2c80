//! Elementwise arithmetic over dense and sparse stores, and determinant
//!
//! # Storage-type promotion
//! - Dense op Dense -> Dense
//! - any Sparse operand -> Sparse
//!
//! A Sparse op Dense result is computed over every cell and then stored
//! sparse, so a dense operand without zeros yields a fully populated sparse
//! result.
//!
//! # Division
//! `divide` fails with [`ValueError::DivisionByZero`] when any divisor cell
//! is zero, before any result is produced. IEEE infinities and NaN never
//! come out of a division by a zero cell.

use super::{DenseData, SparseData, Storage};
use crate::element::Element;
use crate::error::{Result, ValueError};
use nalgebra::DMatrix;
use std::cmp::Ordering;

/// Cell-wise binary operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `a + b`
    Plus,
    /// `a - b`
    Minus,
    /// `a * b` (Hadamard product, not matrix multiplication)
    Times,
    /// `a / b`
    Divide,
}

impl BinaryOp {
    /// Apply the operation to one pair of cells
    #[inline]
    pub fn apply<T: Element>(self, a: T, b: T) -> T {
        match self {
            BinaryOp::Plus => a + b,
            BinaryOp::Minus => a - b,
            BinaryOp::Times => a * b,
            BinaryOp::Divide => a / b,
        }
    }
}

/// Cell-wise sum
///
/// # Errors
///
/// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
pub fn plus<T: Element>(lhs: &Storage<T>, rhs: &Storage<T>) -> Result<Storage<T>> {
    elementwise(lhs, rhs, BinaryOp::Plus)
}

/// Cell-wise difference
///
/// # Errors
///
/// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
pub fn minus<T: Element>(lhs: &Storage<T>, rhs: &Storage<T>) -> Result<Storage<T>> {
    elementwise(lhs, rhs, BinaryOp::Minus)
}

/// Cell-wise (Hadamard) product
///
/// # Errors
///
/// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
pub fn times<T: Element>(lhs: &Storage<T>, rhs: &Storage<T>) -> Result<Storage<T>> {
    elementwise(lhs, rhs, BinaryOp::Times)
}

/// Cell-wise quotient
///
/// # Errors
///
/// - [`ValueError::ShapeMismatch`] when the shapes differ
/// - [`ValueError::DivisionByZero`] at the first zero divisor cell
pub fn divide<T: Element>(lhs: &Storage<T>, rhs: &Storage<T>) -> Result<Storage<T>> {
    elementwise(lhs, rhs, BinaryOp::Divide)
}

/// Validate that `op` can combine `lhs` and `rhs`; rejected operations are logged.
///
/// # Errors
///
/// - [`ValueError::ShapeMismatch`] when the shapes differ
/// - [`ValueError::DivisionByZero`] for [`BinaryOp::Divide`] with a zero divisor cell
pub fn check_operands<T: Element>(lhs: &Storage<T>, rhs: &Storage<T>, op: BinaryOp) -> Result<()> {
    if let Err(e) = lhs.shape().check_same(&rhs.shape()) {
        tracing::debug!(?op, "Rejected elementwise operation: {e}");
        return Err(e);
    }
    if op == BinaryOp::Divide {
        if let Some(index) = first_zero_cell(rhs) {
            tracing::debug!(index, "Rejected elementwise division by a zero cell");
            return Err(ValueError::DivisionByZero { index });
        }
    }
    Ok(())
}

/// Apply `op` cell by cell, promoting to sparse when either operand is sparse.
///
/// # Errors
///
/// - [`ValueError::ShapeMismatch`] when the shapes differ
/// - [`ValueError::DivisionByZero`] for [`BinaryOp::Divide`] with a zero divisor cell
pub fn elementwise<T: Element>(
    lhs: &Storage<T>,
    rhs: &Storage<T>,
    op: BinaryOp,
) -> Result<Storage<T>> {
    check_operands(lhs, rhs, op)?;
    Ok(combine(lhs, rhs, op))
}

/// Elementwise result of operands already accepted by [`check_operands`]
fn combine<T: Element>(lhs: &Storage<T>, rhs: &Storage<T>, op: BinaryOp) -> Storage<T> {
    let result = match (lhs, rhs) {
        (Storage::Dense(a), Storage::Dense(b)) => Storage::Dense(dense_zip(a, b, op)),
        (Storage::Sparse(a), Storage::Sparse(b)) => Storage::Sparse(sparse_merge(a, b, op)),
        _ => Storage::Sparse(mixed(lhs, rhs, op)),
    };
    tracing::trace!(
        ?op,
        lhs = %lhs.storage_type(),
        rhs = %rhs.storage_type(),
        result = %result.storage_type(),
        "Elementwise operation"
    );
    result
}

/// Apply `op` with `rhs` to `lhs` in place, keeping `lhs`'s storage type.
/// On error `lhs` is unchanged.
///
/// # Errors
///
/// Same as [`elementwise`].
pub fn elementwise_in_place<T: Element>(
    lhs: &mut Storage<T>,
    rhs: &Storage<T>,
    op: BinaryOp,
) -> Result<()> {
    check_operands(lhs, rhs, op)?;
    if let (Storage::Dense(a), Storage::Dense(b)) = (&mut *lhs, rhs) {
        a.zip_assign(b, |x, y| op.apply(x, y));
        return Ok(());
    }
    let storage_type = lhs.storage_type();
    *lhs = combine(lhs, rhs, op).into_storage_type(storage_type);
    Ok(())
}

/// Determinant of a square matrix store, computed by LU decomposition in `f64`.
/// Sparse stores are densified first.
///
/// # Errors
///
/// Returns [`ValueError::NotSquare`] for a vector or a non-square matrix.
pub fn determinant<T: Element>(storage: &Storage<T>) -> Result<T> {
    let shape = storage.shape();
    if !shape.is_square() {
        tracing::debug!(%shape, "Rejected determinant of a non-square store");
        return Err(ValueError::NotSquare {
            rows: shape.rows(),
            cols: shape.cols(),
        });
    }
    let n = shape.rows();
    let values: Vec<f64> = storage.dense_values().into_iter().map(T::to_f64).collect();
    let matrix = DMatrix::from_row_slice(n, n, &values);
    Ok(T::from_f64(matrix.determinant()))
}

/// Linear index of the first zero cell, if any
fn first_zero_cell<T: Element>(storage: &Storage<T>) -> Option<usize> {
    match storage {
        Storage::Dense(d) => d.values().iter().position(|v| v.is_zero()),
        Storage::Sparse(s) => {
            // Stored values are never zero, so the first gap in the indices is the answer
            s.indices()
                .iter()
                .enumerate()
                .find(|&(expected, &index)| expected != index)
                .map(|(expected, _)| expected)
                .or_else(|| (s.cardinality() < s.len()).then_some(s.cardinality()))
        }
    }
}

fn dense_zip<T: Element>(a: &DenseData<T>, b: &DenseData<T>, op: BinaryOp) -> DenseData<T> {
    let mut result = a.clone();
    result.zip_assign(b, |x, y| op.apply(x, y));
    result
}

/// Union merge of two index-ascending pair lists
fn sparse_merge<T: Element>(a: &SparseData<T>, b: &SparseData<T>, op: BinaryOp) -> SparseData<T> {
    let mut left = a.iter_non_zero().peekable();
    let mut right = b.iter_non_zero().peekable();
    let mut cells = Vec::with_capacity(a.cardinality() + b.cardinality());
    loop {
        let cell = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (Some((i, x)), None) => {
                left.next();
                (i, op.apply(x, T::ZERO))
            }
            (None, Some((j, y))) => {
                right.next();
                (j, op.apply(T::ZERO, y))
            }
            (Some((i, x)), Some((j, y))) => match i.cmp(&j) {
                Ordering::Less => {
                    left.next();
                    (i, op.apply(x, T::ZERO))
                }
                Ordering::Greater => {
                    right.next();
                    (j, op.apply(T::ZERO, y))
                }
                Ordering::Equal => {
                    left.next();
                    right.next();
                    (i, op.apply(x, y))
                }
            },
        };
        cells.push(cell);
    }
    SparseData::collect_sorted(cells, a.shape())
}

/// Every-cell evaluation for a dense/sparse operand pair, stored sparse
fn mixed<T: Element>(lhs: &Storage<T>, rhs: &Storage<T>, op: BinaryOp) -> SparseData<T> {
    let shape = lhs.shape();
    SparseData::collect_sorted(
        (0..shape.len()).map(|i| (i, op.apply(lhs.get(i), rhs.get(i)))),
        shape,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Shape, StorageType};

    fn dense(values: &[f64], shape: Shape) -> Storage<f64> {
        Storage::from_values(values.to_vec(), shape, StorageType::Dense).unwrap()
    }

    fn sparse(values: &[f64], shape: Shape) -> Storage<f64> {
        Storage::from_values(values.to_vec(), shape, StorageType::Sparse).unwrap()
    }

    #[test]
    fn test_promotion_rules() {
        let shape = Shape::vector(3);
        let d = dense(&[1.0, 2.0, 3.0], shape);
        let s = sparse(&[0.0, 2.0, 0.0], shape);
        assert_eq!(plus(&d, &d).unwrap().storage_type(), StorageType::Dense);
        assert_eq!(plus(&s, &s).unwrap().storage_type(), StorageType::Sparse);
        assert_eq!(plus(&s, &d).unwrap().storage_type(), StorageType::Sparse);
        assert_eq!(times(&d, &s).unwrap().storage_type(), StorageType::Sparse);
        assert_eq!(minus(&d, &s).unwrap().storage_type(), StorageType::Sparse);
    }

    #[test]
    fn test_sparse_plus_dense_is_fully_populated() {
        let shape = Shape::vector(3);
        let d = dense(&[1.0, 2.0, 3.0], shape);
        let s = sparse(&[0.0, 2.0, 0.0], shape);
        let r = plus(&s, &d).unwrap();
        assert_eq!(r.cardinality(), 3);
        assert_eq!(r.dense_values(), vec![1.0, 4.0, 3.0]);
    }

    #[test]
    fn test_sparse_minus_itself_is_empty() {
        let s = sparse(&[0.0, 2.0, 0.0, -1.0], Shape::matrix(2, 2));
        let r = minus(&s, &s).unwrap();
        assert_eq!(r.cardinality(), 0);
        assert_eq!(r.dense_values(), vec![0.0; 4]);
    }

    #[test]
    fn test_sparse_times_is_intersection() {
        let shape = Shape::vector(4);
        let a = sparse(&[1.0, 2.0, 0.0, 4.0], shape);
        let b = sparse(&[0.0, 3.0, 5.0, 2.0], shape);
        let r = times(&a, &b).unwrap();
        match r {
            Storage::Sparse(s) => {
                assert_eq!(s.indices(), &[1, 3]);
                assert_eq!(s.values(), &[6.0, 8.0]);
            }
            Storage::Dense(_) => panic!("expected sparse result"),
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let a = dense(&[1.0, 2.0, 3.0, 4.0], Shape::matrix(2, 2));
        let b = dense(&[1.0, 2.0, 3.0, 4.0], Shape::matrix(1, 4));
        let err = plus(&a, &b).unwrap_err();
        assert_eq!(
            err,
            ValueError::ShapeMismatch {
                expected: Shape::matrix(2, 2),
                got: Shape::matrix(1, 4)
            }
        );
    }

    #[test]
    fn test_divide_by_zero_cell() {
        let shape = Shape::vector(3);
        let a = dense(&[1.0, 2.0, 3.0], shape);
        let b = dense(&[1.0, 0.0, 3.0], shape);
        assert_eq!(
            divide(&a, &b).unwrap_err(),
            ValueError::DivisionByZero { index: 1 }
        );

        let gap_at_end = sparse(&[1.0, 2.0, 0.0], shape);
        assert_eq!(
            divide(&a, &gap_at_end).unwrap_err(),
            ValueError::DivisionByZero { index: 2 }
        );
        let gap_at_start = sparse(&[0.0, 2.0, 3.0], shape);
        assert_eq!(
            divide(&a, &gap_at_start).unwrap_err(),
            ValueError::DivisionByZero { index: 0 }
        );

        let full = sparse(&[2.0, 4.0, 6.0], shape);
        assert_eq!(divide(&a, &full).unwrap().dense_values(), vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_in_place_keeps_storage_type() {
        let shape = Shape::vector(3);
        let mut s = sparse(&[0.0, 2.0, 0.0], shape);
        let d = dense(&[1.0, 1.0, 1.0], shape);
        elementwise_in_place(&mut s, &d, BinaryOp::Plus).unwrap();
        assert_eq!(s.storage_type(), StorageType::Sparse);
        assert_eq!(s.dense_values(), vec![1.0, 3.0, 1.0]);

        let mut d2 = d.clone();
        elementwise_in_place(&mut d2, &s, BinaryOp::Times).unwrap();
        assert_eq!(d2.storage_type(), StorageType::Dense);
        assert_eq!(d2.dense_values(), vec![1.0, 3.0, 1.0]);

        let mut d3 = d.clone();
        elementwise_in_place(&mut d3, &d, BinaryOp::Minus).unwrap();
        assert_eq!(d3.dense_values(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_in_place_failure_leaves_operand() {
        let shape = Shape::vector(2);
        let mut a = dense(&[1.0, 2.0], shape);
        let zero = dense(&[0.0, 1.0], shape);
        assert!(elementwise_in_place(&mut a, &zero, BinaryOp::Divide).is_err());
        assert_eq!(a.dense_values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_determinant_2x2() {
        let m = dense(&[3.0, 8.0, 4.0, 6.0], Shape::matrix(2, 2));
        let expected = 3.0 * 6.0 - 8.0 * 4.0;
        approx::assert_relative_eq!(determinant(&m).unwrap(), expected, epsilon = 1e-12);
        approx::assert_relative_eq!(
            determinant(&m.to_sparse()).unwrap(),
            -14.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_determinant_3x3_and_not_square() {
        let m = dense(
            &[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0],
            Shape::matrix(3, 3),
        );
        approx::assert_relative_eq!(determinant(&m).unwrap(), -306.0, epsilon = 1e-9);

        let r = dense(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Shape::matrix(2, 3));
        let err = determinant(&r).unwrap_err();
        assert_eq!(err, ValueError::NotSquare { rows: 2, cols: 3 });
        assert!(err.is_shape_mismatch());
    }
}
