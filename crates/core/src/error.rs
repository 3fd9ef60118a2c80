//! Error types for quantity values and their storage

use crate::storage::Shape;
use thiserror::Error;

/// Result type alias using the crate's [`ValueError`]
pub type Result<T> = std::result::Result<T, ValueError>;

/// Errors raised by unit construction, storage construction and arithmetic.
///
/// All failures are synchronous and deterministic: a failed constructor
/// produces no object and a failed operation leaves its operands untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Operand or constructor shapes disagree
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Expected shape
        expected: Shape,
        /// Actual shape
        got: Shape,
    },

    /// Matrix dimensions whose cell count does not fit in `usize`
    #[error("Matrix shape {rows} x {cols} has too many cells")]
    ShapeOverflow {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Determinant requested on a non-square matrix
    #[error("Matrix is not square: {rows} x {cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Two-dimensional input whose rows have different lengths
    #[error("Ragged input: row {row} has {got} values, expected {expected}")]
    RaggedInput {
        /// Offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        got: usize,
    },

    /// Construction from zero values
    #[error("Cannot create {0} from empty input")]
    EmptyInput(&'static str),

    /// Facade-level bounds violation
    #[error("Index {index} out of range for size {size}")]
    IndexOutOfRange {
        /// The invalid index
        index: usize,
        /// Number of addressable cells along that axis
        size: usize,
    },

    /// Division by a zero cell or a zero factor
    #[error("Division by zero at linear index {index}")]
    DivisionByZero {
        /// Linear index of the zero divisor cell
        index: usize,
    },

    /// `normalize` on a container whose values sum to zero
    #[error("Sum of values is 0; cannot normalize")]
    NormalizeZeroSum,

    /// Sparse index outside `[0, size)`
    #[error("Sparse index {index} out of range for size {size}")]
    InvalidSparseIndex {
        /// The invalid index
        index: usize,
        /// Logical length of the storage
        size: usize,
    },

    /// Sparse index supplied more than once
    #[error("Sparse index {index} supplied more than once")]
    DuplicateSparseIndex {
        /// The repeated index
        index: usize,
    },

    /// Sparse value and index arrays of unequal length
    #[error("Sparse input has {values} values but {indices} indices")]
    SparseLengthMismatch {
        /// Number of values
        values: usize,
        /// Number of indices
        indices: usize,
    },

    /// Zero or non-finite conversion factor, or non-finite offset
    #[error("Invalid scale: factor {factor}, offset {offset}")]
    InvalidScale {
        /// Multiplicative factor to the SI unit
        factor: f64,
        /// Additive offset to the SI unit
        offset: f64,
    },

    /// Abbreviation that does not belong to the quantity
    #[error("Unknown unit abbreviation '{0}'")]
    UnknownUnit(String),
}

impl ValueError {
    /// Whether this error belongs to the shape-mismatch class
    /// (elementwise shape disagreement, ragged input or non-square determinant).
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            ValueError::ShapeMismatch { .. }
                | ValueError::NotSquare { .. }
                | ValueError::RaggedInput { .. }
        )
    }

    /// Whether this error reports an invalid sparse construction.
    pub fn is_construction_invariant(&self) -> bool {
        matches!(
            self,
            ValueError::InvalidSparseIndex { .. }
                | ValueError::DuplicateSparseIndex { .. }
                | ValueError::SparseLengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = ValueError::ShapeMismatch {
            expected: Shape::matrix(2, 3),
            got: Shape::matrix(3, 2),
        };
        assert_eq!(err.to_string(), "Shape mismatch: expected 2 x 3, got 3 x 2");
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn test_error_classes() {
        assert!(ValueError::NotSquare { rows: 2, cols: 3 }.is_shape_mismatch());
        assert!(!ValueError::NormalizeZeroSum.is_shape_mismatch());
        assert!(ValueError::DuplicateSparseIndex { index: 4 }.is_construction_invariant());
        assert!(!ValueError::EmptyInput("vector").is_construction_invariant());
    }
}
