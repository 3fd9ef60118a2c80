//! Matrices of unit-tagged values and their copy-on-write mutable wrapper

use super::{si_to_value, value_to_si, write_cells, Cells, Kind, KindFor, Relative, Scalar, Vector};
use crate::element::Element;
use crate::error::{Result, ValueError};
use crate::storage::dense::check_rectangular;
use crate::storage::{ops, Shape, Storage, StorageType};
use crate::unit::Unit;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// An immutable row-major matrix of values of one quantity
///
/// # Usage
/// ```
/// use quantity_core::quantities::{LengthMatrix, LengthUnit};
/// use quantity_core::storage::StorageType;
///
/// let m = LengthMatrix::new(&[[1.0, 2.0], [3.0, 4.0]], LengthUnit::Meter, StorageType::Dense).unwrap();
/// assert_eq!(m.rows(), 2);
/// assert_eq!(m.get_si(1, 0).unwrap(), 3.0);
/// assert!((m.determinant().unwrap() + 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix<U, K = Relative, T: Element = f64> {
    data: Arc<Storage<T>>,
    unit: U,
    kind: PhantomData<K>,
}

/// A matrix that can be changed in place; copies its storage on first write
#[derive(Debug, Clone)]
pub struct MutableMatrix<U, K = Relative, T: Element = f64> {
    inner: Matrix<U, K, T>,
}

impl_value_ops!(Matrix, MutableMatrix);

impl<U: Unit, K: KindFor<U>, T: Element> Matrix<U, K, T> {
    /// Create a matrix from rows of values expressed in `unit`
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] when there are no rows or columns
    /// - [`ValueError::RaggedInput`] when the rows differ in length
    pub fn new<R: AsRef<[T]>>(rows: &[R], unit: U, storage_type: StorageType) -> Result<Self> {
        let cols = check_rectangular(rows)?;
        let si = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().map(|&v| value_to_si(v, unit)))
            .collect();
        Self::from_si(si, rows.len(), cols, unit, storage_type)
    }

    /// Create a matrix from row-major SI values, displayed in `unit`
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] when `rows` or `cols` is zero
    /// - [`ValueError::ShapeOverflow`] when `rows * cols` does not fit in `usize`
    /// - [`ValueError::ShapeMismatch`] when `values.len() != rows * cols`
    pub fn from_si(
        values: Vec<T>,
        rows: usize,
        cols: usize,
        unit: U,
        storage_type: StorageType,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ValueError::EmptyInput("matrix"));
        }
        let shape = Shape::try_matrix(rows, cols)?;
        let storage = Storage::from_values(values, shape, storage_type)?;
        Ok(Self::wrap(storage, unit))
    }

    /// Create a `rows x cols` matrix from (linear index, value) pairs; values
    /// are expressed in `unit` and every other cell is zero in SI.
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] when `rows` or `cols` is zero
    /// - [`ValueError::ShapeOverflow`] when `rows * cols` does not fit in `usize`
    /// - a construction invariant error for unequal array lengths, duplicate
    ///   or out-of-range indices
    pub fn from_sparse_pairs(
        values: &[T],
        indices: Vec<usize>,
        rows: usize,
        cols: usize,
        unit: U,
        storage_type: StorageType,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ValueError::EmptyInput("matrix"));
        }
        let shape = Shape::try_matrix(rows, cols)?;
        let si = values.iter().map(|&v| value_to_si(v, unit)).collect();
        let storage = Storage::from_pairs(si, indices, shape, storage_type)?;
        Ok(Self::wrap(storage, unit))
    }

    /// Create a `rows x cols` matrix from `(row, col, value)` entries, values
    /// expressed in `unit`
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] when `rows` or `cols` is zero
    /// - [`ValueError::ShapeOverflow`] when `rows * cols` does not fit in `usize`
    /// - [`ValueError::IndexOutOfRange`] for an entry outside the matrix
    /// - [`ValueError::DuplicateSparseIndex`] for a cell given twice
    pub fn from_entries(
        entries: &[(usize, usize, T)],
        rows: usize,
        cols: usize,
        unit: U,
        storage_type: StorageType,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ValueError::EmptyInput("matrix"));
        }
        let shape = Shape::try_matrix(rows, cols)?;
        let mut indices = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for &(row, col, value) in entries {
            check_cell(shape, row, col)?;
            indices.push(shape.index(row, col));
            values.push(value);
        }
        Self::from_sparse_pairs(&values, indices, rows, cols, unit, storage_type)
    }

    /// Create a matrix from rows of scalars, displayed in the first scalar's unit
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] when there are no rows or columns
    /// - [`ValueError::RaggedInput`] when the rows differ in length
    pub fn from_scalars<R: AsRef<[Scalar<U, K, T>]>>(
        rows: &[R],
        storage_type: StorageType,
    ) -> Result<Self> {
        let cols = check_rectangular(rows)?;
        let unit = rows[0].as_ref()[0].unit();
        let si = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().map(Scalar::si_value))
            .collect();
        Self::from_si(si, rows.len(), cols, unit, storage_type)
    }

    /// Wrap an existing SI store
    ///
    /// # Errors
    ///
    /// - [`ValueError::EmptyInput`] for a zero-sized store
    /// - [`ValueError::ShapeMismatch`] for a vector-shaped store
    pub fn from_storage(storage: Storage<T>, unit: U) -> Result<Self> {
        match storage.shape() {
            shape @ Shape::Matrix { .. } if shape.is_empty() => {
                Err(ValueError::EmptyInput("matrix"))
            }
            Shape::Matrix { .. } => Ok(Self::wrap(storage, unit)),
            shape @ Shape::Vector(n) => Err(ValueError::ShapeMismatch {
                expected: Shape::matrix(1, n),
                got: shape,
            }),
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.data.shape().rows()
    }

    /// Number of columns
    #[inline]
    pub fn columns(&self) -> usize {
        self.data.shape().cols()
    }

    /// Total number of cells
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix has as many rows as columns
    #[inline]
    pub fn is_square(&self) -> bool {
        self.data.shape().is_square()
    }

    /// Cell `(row, col)` as a scalar in the display unit
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when the cell is outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<Scalar<U, K, T>> {
        Ok(Scalar::from_si(self.get_si(row, col)?, self.unit))
    }

    /// SI value of cell `(row, col)`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when the cell is outside the matrix.
    pub fn get_si(&self, row: usize, col: usize) -> Result<T> {
        check_cell(self.data.shape(), row, col)?;
        Ok(self.data.get_at(row, col))
    }

    /// Value of cell `(row, col)` expressed in `unit`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when the cell is outside the matrix.
    pub fn get_in_unit(&self, row: usize, col: usize, unit: U) -> Result<T> {
        Ok(si_to_value(self.get_si(row, col)?, unit))
    }

    /// Row `row` as a vector with this matrix's unit and storage type
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `row >= rows()`.
    pub fn row(&self, row: usize) -> Result<Vector<U, K, T>> {
        let rows = self.rows();
        if row >= rows {
            return Err(ValueError::IndexOutOfRange { index: row, size: rows });
        }
        let values = (0..self.columns())
            .map(|col| self.data.get_at(row, col))
            .collect();
        Vector::from_si(values, self.unit, self.storage_type())
    }

    /// Column `col` as a vector with this matrix's unit and storage type
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when `col >= columns()`.
    pub fn column(&self, col: usize) -> Result<Vector<U, K, T>> {
        let cols = self.columns();
        if col >= cols {
            return Err(ValueError::IndexOutOfRange { index: col, size: cols });
        }
        let values = (0..self.rows())
            .map(|row| self.data.get_at(row, col))
            .collect();
        Vector::from_si(values, self.unit, self.storage_type())
    }

    /// Main diagonal as a vector
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotSquare`] for a non-square matrix.
    pub fn diagonal(&self) -> Result<Vector<U, K, T>> {
        self.check_square()?;
        let values = (0..self.rows()).map(|i| self.data.get_at(i, i)).collect();
        Vector::from_si(values, self.unit, self.storage_type())
    }

    fn check_square(&self) -> Result<()> {
        if self.is_square() {
            return Ok(());
        }
        Err(ValueError::NotSquare {
            rows: self.rows(),
            cols: self.columns(),
        })
    }

    /// Determinant of the SI values
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotSquare`] for a non-square matrix.
    pub fn determinant(&self) -> Result<T> {
        ops::determinant(&self.data)
    }

    /// Every cell in SI, as rows
    pub fn values_si(&self) -> Vec<Vec<T>> {
        self.values_in_unit(U::si())
    }

    /// Every cell expressed in `unit`, as rows
    pub fn values_in_unit(&self, unit: U) -> Vec<Vec<T>> {
        let cells: Vec<T> = self
            .data
            .dense_values()
            .into_iter()
            .map(|si| si_to_value(si, unit))
            .collect();
        cells.chunks(self.columns()).map(<[T]>::to_vec).collect()
    }

    /// Every cell as a scalar in the display unit, as rows
    pub fn to_scalars(&self) -> Vec<Vec<Scalar<U, K, T>>> {
        let unit = self.unit;
        self.values_si()
            .into_iter()
            .map(|row| row.into_iter().map(|si| Scalar::from_si(si, unit)).collect())
            .collect()
    }

    fn describe(&self, mutable: bool, unit: U, verbose: bool) -> String {
        let rows: Vec<String> = self
            .values_in_unit(unit)
            .iter()
            .map(|row| Cells(row).to_string())
            .collect();
        let body = rows.join("\n");
        if !verbose {
            return format!("{body} {unit}");
        }
        let access = if mutable { "Mutable" } else { "Immutable" };
        format!(
            "{access} {} {}Matrix {} x {}\n{body} {unit}",
            self.storage_type(),
            K::NAME,
            self.rows(),
            self.columns()
        )
    }

    /// Render the values in `unit`, one row per line; `verbose` adds a header
    /// line with mutability, storage type, kind and shape
    pub fn format_in(&self, unit: U, verbose: bool) -> String {
        self.describe(false, unit, verbose)
    }
}

fn check_cell(shape: Shape, row: usize, col: usize) -> Result<()> {
    if row >= shape.rows() {
        return Err(ValueError::IndexOutOfRange {
            index: row,
            size: shape.rows(),
        });
    }
    if col >= shape.cols() {
        return Err(ValueError::IndexOutOfRange {
            index: col,
            size: shape.cols(),
        });
    }
    Ok(())
}

impl<U: Unit, K: Kind, T: Element> fmt::Display for Matrix<U, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.data.shape().cols();
        let cells: Vec<T> = self
            .data
            .dense_values()
            .into_iter()
            .map(|si| si_to_value(si, self.unit))
            .collect();
        for (i, row) in cells.chunks(cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_cells(f, row)?;
        }
        write!(f, " {}", self.unit)
    }
}

impl<U: Unit, K: KindFor<U>, T: Element> MutableMatrix<U, K, T> {
    /// Overwrite cell `(row, col)` with a scalar
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when the cell is outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: Scalar<U, K, T>) -> Result<()> {
        self.set_si(row, col, value.si_value())
    }

    /// Overwrite cell `(row, col)` with an SI value
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when the cell is outside the matrix.
    pub fn set_si(&mut self, row: usize, col: usize, value_si: T) -> Result<()> {
        check_cell(self.inner.data.shape(), row, col)?;
        self.data_mut().set_at(row, col, value_si);
        Ok(())
    }

    /// Overwrite cell `(row, col)` with a value expressed in `unit`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::IndexOutOfRange`] when the cell is outside the matrix.
    pub fn set_in_unit(&mut self, row: usize, col: usize, value: T, unit: U) -> Result<()> {
        self.set_si(row, col, value_to_si(value, unit))
    }

    /// Render the values in `unit`, one row per line; `verbose` adds a header
    /// line with mutability, storage type, kind and shape
    pub fn format_in(&self, unit: U, verbose: bool) -> String {
        self.inner.describe(true, unit, verbose)
    }
}

impl<U: Unit, K: Kind, T: Element> fmt::Display for MutableMatrix<U, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
