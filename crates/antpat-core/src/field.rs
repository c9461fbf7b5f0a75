//! Tangential vector fields sampled on a spherical grid
//!
//! A [`TangentialField`] owns a [`SphericalGrid`] and the two complex
//! components `Fθ`, `Fφ` co-indexed with it, optionally stacked along a
//! leading radial axis (a radius, or in practice a frequency).
//!
//! ## Queries
//!
//! ```text
//! (θ, φ) ──principal_branch──> (θ', φ' ∈ [0, 2π))
//!                                   │
//!   grid + F ──periodify──> axes (R?, θ, φ±wrap) ──multilinear──> F(R, θ', φ')
//! ```
//!
//! Interpolation requires a canonical grid (ascending elevation, ascending
//! azimuth in [0, 2π)); call [`TangentialField::canonicalize`] on fields
//! built from raw simulation output.
//!
//! ## Example
//!
//! ```rust
//! use antpat_core::field::{BasisType, TangentialField};
//! use antpat_core::grid::SphericalGrid;
//! use antpat_core::types::Complex;
//! use ndarray::Array2;
//!
//! let grid = SphericalGrid::full_sphere(5, 8).unwrap();
//! let f_th = Array2::from_elem(grid.dim(), Complex::new(1.0, 0.0));
//! let f_ph = Array2::from_elem(grid.dim(), Complex::new(0.0, 0.0));
//! let field = TangentialField::new(grid, f_th, f_ph, BasisType::Polar).unwrap();
//!
//! let (th, _ph) = field.value_at(&[0.3], &[6.2], None).unwrap();
//! assert!((th[[0, 0]] - Complex::new(1.0, 0.0)).norm() < 1e-12);
//! ```

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::angles::principal_branch;
use crate::grid::{AzimuthPermutation, Sense, SphericalGrid};
use crate::interp::{GridAxis, RegularGridInterpolator};
use crate::linalg::Mat3;
use crate::periodic::periodify;
use crate::polarization::ludwig3_to_sph;
use crate::rotation::reexpress;
use crate::source::FarFieldRequest;
use crate::types::{Complex, ComplexGrid, ComplexStack, FieldError, FieldResult};

/// How the two component arrays handed to a constructor are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisType {
    /// `(Fθ, Fφ)`
    #[default]
    Polar,
    /// Ludwig-3 `(Fu, Fv)`, converted to spherical on construction
    #[serde(alias = "Ludwig3")]
    Ludwig3,
}

impl FromStr for BasisType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polar" => Ok(BasisType::Polar),
            "Ludwig3" | "ludwig3" => Ok(BasisType::Ludwig3),
            other => Err(FieldError::Configuration(format!(
                "unknown basis type '{}' (expected polar or Ludwig3)",
                other
            ))),
        }
    }
}

impl fmt::Display for BasisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisType::Polar => write!(f, "polar"),
            BasisType::Ludwig3 => write!(f, "Ludwig3"),
        }
    }
}

/// Complex tangential field on a spherical grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TangentialField {
    grid: SphericalGrid,
    radii: Option<Vec<f64>>,
    /// `[radius, elevation, azimuth]`; radius axis has length 1 when `radii` is `None`
    f_theta: ComplexStack,
    f_phi: ComplexStack,
}

impl TangentialField {
    /// Field without a radial axis.
    pub fn new(grid: SphericalGrid, f1: ComplexGrid, f2: ComplexGrid, basis: BasisType) -> FieldResult<Self> {
        grid.check_trailing("F1", &f1)?;
        grid.check_trailing("F2", &f2)?;
        Self::from_stacks(grid, None, f1.insert_axis(Axis(0)), f2.insert_axis(Axis(0)), basis)
    }

    /// Field sampled at several strictly ascending radii (or frequencies).
    pub fn with_radial_axis(
        grid: SphericalGrid,
        radii: Vec<f64>,
        f1: ComplexStack,
        f2: ComplexStack,
        basis: BasisType,
    ) -> FieldResult<Self> {
        if radii.is_empty() {
            return Err(FieldError::Configuration("radial axis is empty".to_string()));
        }
        if !radii.windows(2).all(|w| w[0] < w[1]) {
            return Err(FieldError::NonMonotonicAxis("radius"));
        }
        let (m, n) = grid.dim();
        let expected = [radii.len(), m, n];
        if f1.shape() != &expected[..] {
            return Err(FieldError::shape("F1", &expected, f1.shape()));
        }
        if f2.shape() != &expected[..] {
            return Err(FieldError::shape("F2", &expected, f2.shape()));
        }
        Self::from_stacks(grid, Some(radii), f1, f2, basis)
    }

    /// Build from a simulation request: degrees to radians, one radial
    /// sample per frequency.
    pub fn from_request(request: &FarFieldRequest) -> FieldResult<Self> {
        let grid = SphericalGrid::from_degrees(&request.theta_deg, &request.phi_deg)?;
        let nf = request.frequencies.len();
        if nf == 0 {
            return Err(FieldError::Configuration(format!(
                "request '{}' has no frequencies",
                request.name
            )));
        }
        for (what, comps) in [("Etheta", &request.e_theta), ("Ephi", &request.e_phi)] {
            if comps.len() != nf {
                return Err(FieldError::shape(what, &[nf], &[comps.len()]));
            }
            for c in comps.iter() {
                grid.check_trailing(what, c)?;
            }
        }
        let stack = |comps: &[ComplexGrid]| -> FieldResult<ComplexStack> {
            let views: Vec<ArrayView2<Complex>> = comps.iter().map(|c| c.view()).collect();
            ndarray::stack(Axis(0), &views).map_err(|_| {
                let (m, n) = grid.dim();
                FieldError::shape("frequency stack", &[nf, m, n], &[views.len()])
            })
        };
        let f_theta = stack(&request.e_theta[..])?;
        let f_phi = stack(&request.e_phi[..])?;
        debug!(
            request = %request.name,
            frequencies = nf,
            shape = ?grid.dim(),
            "Built field from request"
        );
        Self::with_radial_axis(grid, request.frequencies.clone(), f_theta, f_phi, BasisType::Polar)
    }

    fn from_stacks(
        grid: SphericalGrid,
        radii: Option<Vec<f64>>,
        f1: ComplexStack,
        f2: ComplexStack,
        basis: BasisType,
    ) -> FieldResult<Self> {
        let (f_theta, f_phi) = match basis {
            BasisType::Polar => (f1, f2),
            BasisType::Ludwig3 => {
                let az = grid
                    .phi()
                    .broadcast(f1.dim())
                    .ok_or_else(|| FieldError::shape("F1", &[grid.dim().0, grid.dim().1], f1.shape()))?;
                ludwig3_to_sph(&az, &f1, &f2)?
            }
        };
        Ok(Self {
            grid,
            radii,
            f_theta,
            f_phi,
        })
    }

    pub fn grid(&self) -> &SphericalGrid {
        &self.grid
    }

    pub fn radii(&self) -> Option<&[f64]> {
        self.radii.as_deref()
    }

    /// Stored component stacks `(Fθ, Fφ)`, indexed `[radius, elevation, azimuth]`.
    pub fn stacks(&self) -> (&ComplexStack, &ComplexStack) {
        (&self.f_theta, &self.f_phi)
    }

    /// Index of the radial slice for `radius`.
    ///
    /// `None` is accepted only when there is a single slice. A given radius
    /// must match a stored one exactly.
    pub fn radius_index(&self, radius: Option<f64>) -> FieldResult<usize> {
        match (radius, self.radii.as_deref()) {
            (None, None) => Ok(0),
            (None, Some(r)) if r.len() == 1 => Ok(0),
            (None, Some(r)) => Err(FieldError::RadiusRequired(r.len())),
            (Some(x), None) => Err(FieldError::RadiusNotFound(x)),
            (Some(x), Some(r)) => r
                .iter()
                .position(|&v| v == x)
                .ok_or(FieldError::RadiusNotFound(x)),
        }
    }

    /// Raw `(Fθ, Fφ)` of the only radial slice.
    pub fn components(&self) -> FieldResult<(ArrayView2<'_, Complex>, ArrayView2<'_, Complex>)> {
        self.components_at(None)
    }

    /// Raw `(Fθ, Fφ)` at a stored radius.
    pub fn components_at(
        &self,
        radius: Option<f64>,
    ) -> FieldResult<(ArrayView2<'_, Complex>, ArrayView2<'_, Complex>)> {
        let k = self.radius_index(radius)?;
        Ok((
            self.f_theta.index_axis(Axis(0), k),
            self.f_phi.index_axis(Axis(0), k),
        ))
    }

    /// Pick a stored radius: the first one when none is requested, the
    /// nearest one otherwise. `None` for fields without a radial axis.
    pub fn select_radius(&self, requested: Option<f64>) -> Option<f64> {
        let radii = self.radii.as_deref()?;
        match requested {
            None => {
                info!(available = ?radii, selected = radii[0], "No frequency requested, using first");
                Some(radii[0])
            }
            Some(want) => {
                let best = radii
                    .iter()
                    .copied()
                    .min_by(|a, b| (a - want).abs().total_cmp(&(b - want).abs()))?;
                debug!(requested = want, selected = best, "Selected nearest frequency");
                Some(best)
            }
        }
    }

    /// Grid step `(dθ, dφ)`; meaningful for uniform grids only.
    pub fn angular_resolution(&self) -> (f64, f64) {
        self.grid.angular_resolution()
    }

    /// Interpolated components at arbitrary directions.
    ///
    /// Angles are reduced to the principal branch first, so any real
    /// azimuth is accepted. The result has shape `(n_radii, n_points)`:
    /// one row per queried radius (all stored radii when `radii` is `None`)
    /// or a single row for a field without radial axis.
    pub fn value_at(
        &self,
        thetas: &[f64],
        phis: &[f64],
        radii: Option<&[f64]>,
    ) -> FieldResult<(Array2<Complex>, Array2<Complex>)> {
        if thetas.len() != phis.len() {
            return Err(FieldError::shape("phis", &[thetas.len()], &[phis.len()]));
        }
        let (axes, f_theta, f_phi) = periodify(&self.grid, &self.f_theta, &self.f_phi)?;

        let (query_radii, interp_th, interp_ph) = match &self.radii {
            Some(stored) => {
                let mk = |values: ComplexStack| {
                    RegularGridInterpolator::new(
                        vec![
                            GridAxis::new("radius", Array1::from(stored.clone())),
                            GridAxis::new("theta", axes.theta.clone()),
                            GridAxis::new("phi", axes.phi.clone()),
                        ],
                        values.into_dyn(),
                    )
                };
                let q = radii.map_or_else(|| stored.clone(), <[f64]>::to_vec);
                (Some(q), mk(f_theta)?, mk(f_phi)?)
            }
            None => {
                if let Some(r) = radii {
                    return Err(FieldError::RadiusNotFound(r.first().copied().unwrap_or(f64::NAN)));
                }
                let mk = |values: ComplexStack| {
                    RegularGridInterpolator::new(
                        vec![
                            GridAxis::new("theta", axes.theta.clone()),
                            GridAxis::new("phi", axes.phi.clone()),
                        ],
                        values.index_axis_move(Axis(0), 0).into_dyn(),
                    )
                };
                (None, mk(f_theta)?, mk(f_phi)?)
            }
        };

        let reduced: Vec<(f64, f64)> = thetas
            .iter()
            .zip(phis)
            .map(|(&t, &p)| principal_branch(t, p))
            .collect();

        let rows = query_radii.as_ref().map_or(1, Vec::len);
        let mut out_th = Array2::from_elem((rows, reduced.len()), Complex::new(0.0, 0.0));
        let mut out_ph = out_th.clone();
        for row in 0..rows {
            for (k, &(t, p)) in reduced.iter().enumerate() {
                let (a, b) = match &query_radii {
                    Some(q) => {
                        let point = [q[row], t, p];
                        (interp_th.evaluate(&point)?, interp_ph.evaluate(&point)?)
                    }
                    None => {
                        let point = [t, p];
                        (interp_th.evaluate(&point)?, interp_ph.evaluate(&point)?)
                    }
                };
                out_th[[row, k]] = a;
                out_ph[[row, k]] = b;
            }
        }
        Ok((out_th, out_ph))
    }

    /// Stored components of the closest grid sample, which must lie
    /// within one grid step of `(theta, phi)` on both axes.
    ///
    /// No interpolation and no principal-branch reduction is done.
    pub fn nearest_value_at(&self, theta: f64, phi: f64, radius: Option<f64>) -> FieldResult<(Complex, Complex)> {
        let k = self.radius_index(radius)?;
        let (resol_th, resol_ph) = self.grid.angular_resolution();
        let miss = || FieldError::NoSampleWithinTolerance { theta, phi };
        let i = closest_within(&self.grid.elevation_axis(), theta, resol_th.abs()).ok_or_else(miss)?;
        let j = closest_within(&self.grid.azimuth_axis(), phi, resol_ph.abs()).ok_or_else(miss)?;
        Ok((self.f_theta[[k, i, j]], self.f_phi[[k, i, j]]))
    }

    /// Wrap and sort the grid azimuths, moving the field columns with them.
    pub fn canonicalize(&mut self) {
        let perm = self.grid.canonicalize();
        self.permute(&perm, "canonicalize");
    }

    /// Rotate the grid a quarter turn about z, moving the field columns with it.
    pub fn rotate90z(&mut self, sense: Sense) {
        let perm = self.grid.rotate90z(sense);
        self.permute(&perm, "rotate90z");
    }

    fn permute(&mut self, perm: &AzimuthPermutation, op: &'static str) {
        debug!(op, identity = perm.is_identity(), order = ?perm.indices(), "Azimuth permutation");
        if !perm.is_identity() {
            self.f_theta = perm.apply(&self.f_theta);
            self.f_phi = perm.apply(&self.f_phi);
        }
    }

    /// The same field expressed in the tangential basis of a rotated frame.
    ///
    /// The grid is unchanged; every sample of every radial slice is mapped
    /// through its parallactic matrix. Grids containing a pole fail with
    /// [`FieldError::SingularGeometry`].
    pub fn reexpressed(&self, rotation: &Mat3) -> FieldResult<Self> {
        let thetas: Vec<f64> = self.grid.theta().iter().copied().collect();
        let phis: Vec<f64> = self.grid.phi().iter().copied().collect();
        let dim = self.f_theta.dim();
        let mut new_th = Vec::with_capacity(self.f_theta.len());
        let mut new_ph = Vec::with_capacity(self.f_phi.len());
        for (slice_th, slice_ph) in self.f_theta.outer_iter().zip(self.f_phi.outer_iter()) {
            let th: Vec<Complex> = slice_th.iter().copied().collect();
            let ph: Vec<Complex> = slice_ph.iter().copied().collect();
            let (rt, rp) = reexpress(rotation, &thetas, &phis, &th, &ph)?;
            new_th.extend(rt);
            new_ph.extend(rp);
        }
        let to_stack = |v: Vec<Complex>| {
            ComplexStack::from_shape_vec(dim, v).map_err(|_| FieldError::shape("rotated field", &[dim.0, dim.1, dim.2], &[]))
        };
        Ok(Self {
            grid: self.grid.clone(),
            radii: self.radii.clone(),
            f_theta: to_stack(new_th)?,
            f_phi: to_stack(new_ph)?,
        })
    }
}

/// Index of the axis sample closest to `x`, if within `tol` of it.
fn closest_within(axis: &Array1<f64>, x: f64, tol: f64) -> Option<usize> {
    axis.iter()
        .enumerate()
        .map(|(i, &a)| (i, (a - x).abs()))
        .filter(|&(_, d)| d <= tol)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
