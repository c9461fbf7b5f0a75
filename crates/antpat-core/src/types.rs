//! Core types for tangential field processing
//!
//! This module defines the scalar and array aliases shared by every other
//! module, and the error type returned by all fallible field operations.
//!
//! ## Field Components
//!
//! A radiated far field has no radial component: at every direction on the
//! sphere it is a complex vector in the local tangent plane, described by an
//! elevation (θ) and an azimuth (φ) component.
//!
//! ```text
//!              z
//!              ^   r̂
//!              |  /
//!              | /  θ̂ (towards increasing elevation)
//!              |/__/
//!              +----> φ̂ (towards increasing azimuth)
//!             /
//!            x
//! ```

use ndarray::{Array2, Array3};
use num_complex::Complex64;

/// Type alias for complex field values using f64 precision
pub type Complex = Complex64;

/// A 2-D mesh of complex samples indexed `[elevation, azimuth]`
pub type ComplexGrid = Array2<Complex>;

/// A stack of complex meshes indexed `[radius, elevation, azimuth]`
pub type ComplexStack = Array3<Complex>;

/// Result type for field operations
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur while building, querying or transforming a field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Multiple requests available ({}); specify one", .available.join(", "))]
    AmbiguousSelection { available: Vec<String> },

    #[error("Request not found: {0}")]
    RequestNotFound(String),

    #[error("No radial sample equal to {0}")]
    RadiusNotFound(f64),

    #[error("Field has {0} radial samples; specify a radius")]
    RadiusRequired(usize),

    #[error("Query {value} outside {axis} domain [{min}, {max}]")]
    OutOfDomain {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Local basis undefined at pole direction ({x}, {y}, {z})")]
    SingularGeometry { x: f64, y: f64, z: f64 },

    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Axis {0} must be strictly ascending")]
    NonMonotonicAxis(&'static str),

    #[error("No grid sample within one step of (theta={theta}, phi={phi})")]
    NoSampleWithinTolerance { theta: f64, phi: f64 },
}

impl FieldError {
    pub(crate) fn shape(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        FieldError::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
