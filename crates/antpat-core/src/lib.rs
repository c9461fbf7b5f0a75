//! # Antenna Pattern Core Library
//!
//! This crate represents the radiated far field of an antenna as a complex
//! tangential vector field on a rectangular (elevation, azimuth) grid, and
//! provides the operations needed to analyse it:
//!
//! - **Grids**: principal-branch angle reduction, canonical azimuth order,
//!   quarter-turn rotations about the pole
//! - **Queries**: multilinear interpolation over (radius, θ, φ) with
//!   periodic continuation across the azimuth seam, nearest-sample lookup
//! - **Bases**: local spherical basis matrices, re-expression of a field in
//!   a rotated frame, Ludwig-3 and circular polarization components
//! - **Dual polarization**: Jones matrices, amplitude gain and IXR
//! - **Display**: projected coordinates and real-valued panels for plotting
//!
//! ## Data Flow
//!
//! ```text
//! FarFieldSource ─select_request─> FarFieldRequest ─from_request─> TangentialField
//!                                                                      │
//!        ┌───────────────┬─────────────────┬──────────────────┬────────┘
//!        ▼               ▼                 ▼                  ▼
//!    value_at       reexpressed     polarization        pattern_view
//! ```
//!
//! ## Example
//!
//! ```rust
//! use antpat_core::prelude::*;
//! use ndarray::Array2;
//!
//! let grid = SphericalGrid::zenith_hemisphere(10, 36)?;
//! let f_th = grid.theta().mapv(|t| Complex::new(t.cos(), 0.0));
//! let f_ph = Array2::from_elem(grid.dim(), Complex::new(0.0, 0.0));
//! let mut field = TangentialField::new(grid, f_th, f_ph, BasisType::Polar)?;
//! field.canonicalize();
//!
//! let (e_th, e_ph) = field.value_at(&[0.25], &[-0.1], None)?;
//! let (e_u, e_v) = sph_to_ludwig3_point(-0.1, e_th[[0, 0]], e_ph[[0, 0]]);
//! assert!((e_u.norm_sqr() + e_v.norm_sqr() - e_th[[0, 0]].norm_sqr()).abs() < 1e-12);
//! # Ok::<(), antpat_core::FieldError>(())
//! ```

pub mod angles;
pub mod basis;
pub mod config;
pub mod display;
pub mod field;
pub mod grid;
pub mod interp;
pub mod jones;
pub mod linalg;
pub mod observe;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod periodic;
pub mod polarization;
pub mod rotation;
pub mod source;
pub mod types;

pub use field::{BasisType, TangentialField};
pub use grid::{Sense, SphericalGrid};
pub use types::{Complex, FieldError, FieldResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::angles::{principal_branch, sph_to_cart};
    pub use crate::basis::{basis_at, BasisMatrix, BasisOrder};
    pub use crate::display::{pattern_view, ComplexRepr, DisplayOptions, Projection, VectorComponents};
    pub use crate::field::{BasisType, TangentialField};
    pub use crate::grid::{Sense, SphericalGrid};
    pub use crate::jones::{gain_and_ixr, ixr_m, DualPolarizedField, JonesMatrix, Polarization};
    pub use crate::linalg::{Mat3, Vec3};
    pub use crate::polarization::{sph_to_circular_point, sph_to_ludwig3_point};
    pub use crate::source::{select_request, FarFieldRequest, FarFieldSource, RequestSet};
    pub use crate::types::{Complex, FieldError, FieldResult};
}
