//! Quantity Core Library
//!
//! Strongly typed physical quantities: scalars, vectors and matrices that
//! carry a unit, store their values in SI and convert on demand.
//!
//! ## Layers
//!
//! - [`unit`]: units, their scale to SI and the conversion contract
//! - [`quantities`]: the unit tables (length, time, temperature, ...) and type aliases
//! - [`storage`]: unit-free dense and sparse SI stores plus elementwise arithmetic
//! - [`value`]: unit-tagged [`Scalar`], [`Vector`] and [`Matrix`] values,
//!   absolute or relative, with copy-on-write mutable wrappers
//!
//! ```
//! use quantity_core::quantities::{Length, LengthUnit, LengthVector};
//! use quantity_core::StorageType;
//!
//! let v = LengthVector::new(&[1.0, 2.0], LengthUnit::Kilometer, StorageType::Dense).unwrap();
//! let mut m = v.mutable();
//! m.increment_by_scalar(Length::new(500.0, LengthUnit::Meter));
//! assert_eq!(m.values_in_unit(LengthUnit::Kilometer), vec![1.5, 2.5]);
//! assert_eq!(v.values_in_unit(LengthUnit::Kilometer), vec![1.0, 2.0]);
//! ```

// Scalar element types and errors
pub mod element;
pub mod error;

// Units and unit tables
pub mod quantities;
pub mod unit;

// Unit-free SI storage
pub mod storage;

// Unit-tagged values
pub mod value;

// Lets `define_units!` expand in crates that do not depend on serde
#[doc(hidden)]
pub use serde as __serde;

// Re-export core types
pub use element::Element;
pub use error::{Result, ValueError};
pub use unit::{AbsoluteUnit, Scale, Unit};

// Re-export storage types
pub use storage::{Shape, Storage, StorageType};

// Re-export value types
pub use value::{Absolute, Kind, Matrix, MutableMatrix, MutableVector, Relative, Scalar, Vector};
