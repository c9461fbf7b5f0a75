//! Rectangular mesh of sample directions on the sphere
//!
//! A [`SphericalGrid`] is a pair of 2-D meshes `theta[i, j]` and `phi[i, j]`
//! laid out like `meshgrid(theta_axis, phi_axis, indexing = 'ij')`: the
//! elevation varies only with the row index `i`, the azimuth only with the
//! column index `j`.
//!
//! ```text
//!            j (azimuth) ->
//!          φ0    φ1    φ2   ...
//!   i  θ0  •     •     •
//!   |  θ1  •     •     •
//!   v  θ2  •     •     •
//! ```
//!
//! ## Canonical Order
//!
//! Simulation output often lists azimuth over (-π, π] or in an arbitrary
//! order. [`SphericalGrid::canonicalize`] wraps every azimuth into [0, 2π)
//! and sorts the columns ascending, returning the column permutation so the
//! owner of co-indexed field arrays can apply it in the same step.

use ndarray::{Array, Array1, Array2, ArrayBase, Axis, Data, Dimension, RemoveAxis};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::angles::{deg2rad, wrap_azimuth};
use crate::types::{FieldError, FieldResult};

/// Direction of a quarter turn about the pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// Counter-clockwise seen from +z (azimuth increases)
    Positive,
    /// Clockwise seen from +z (azimuth decreases)
    Negative,
}

impl Sense {
    pub fn sign(self) -> f64 {
        match self {
            Sense::Positive => 1.0,
            Sense::Negative => -1.0,
        }
    }
}

/// Column permutation produced by a canonicalizing grid operation.
///
/// Entry `k` is the old column index that ends up at position `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzimuthPermutation(Vec<usize>);

impl AzimuthPermutation {
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(k, &i)| k == i)
    }

    /// Reorder the last axis of `array` (the azimuth axis) by this permutation.
    pub fn apply<A, S, D>(&self, array: &ArrayBase<S, D>) -> Array<A, D>
    where
        A: Clone,
        S: Data<Elem = A>,
        D: Dimension + RemoveAxis,
    {
        let last = Axis(array.ndim() - 1);
        array.select(last, &self.0)
    }
}

/// Rectangular (elevation, azimuth) sample mesh in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalGrid {
    theta: Array2<f64>,
    phi: Array2<f64>,
}

impl SphericalGrid {
    /// Create a grid from elevation and azimuth meshes in radians.
    pub fn new(theta: Array2<f64>, phi: Array2<f64>) -> FieldResult<Self> {
        if theta.dim() != phi.dim() {
            return Err(FieldError::shape("phi mesh", theta.shape(), phi.shape()));
        }
        if theta.is_empty() {
            return Err(FieldError::Configuration("grid has no samples".to_string()));
        }
        Ok(Self { theta, phi })
    }

    /// Create a grid from meshes given in degrees.
    pub fn from_degrees(theta_deg: &Array2<f64>, phi_deg: &Array2<f64>) -> FieldResult<Self> {
        Self::new(deg2rad(theta_deg), deg2rad(phi_deg))
    }

    /// Build the meshes from 1-D elevation and azimuth axes.
    pub fn from_axes(theta_axis: &[f64], phi_axis: &[f64]) -> FieldResult<Self> {
        let shape = (theta_axis.len(), phi_axis.len());
        let theta = Array2::from_shape_fn(shape, |(i, _)| theta_axis[i]);
        let phi = Array2::from_shape_fn(shape, |(_, j)| phi_axis[j]);
        Self::new(theta, phi)
    }

    /// Upper hemisphere: `n_theta` elevations over [0, π/2] inclusive and
    /// `n_phi` azimuths over [0, 2π) exclusive.
    pub fn zenith_hemisphere(n_theta: usize, n_phi: usize) -> FieldResult<Self> {
        Self::from_axes(&linspace(0.0, FRAC_PI_2, n_theta), &azimuths(n_phi))
    }

    /// Whole sphere: elevations over [0, π] inclusive.
    pub fn full_sphere(n_theta: usize, n_phi: usize) -> FieldResult<Self> {
        Self::from_axes(&linspace(0.0, PI, n_theta), &azimuths(n_phi))
    }

    pub fn theta(&self) -> &Array2<f64> {
        &self.theta
    }

    pub fn phi(&self) -> &Array2<f64> {
        &self.phi
    }

    /// `(n_elevation, n_azimuth)`
    pub fn dim(&self) -> (usize, usize) {
        self.theta.dim()
    }

    /// Elevation axis, taken from the first column.
    pub fn elevation_axis(&self) -> Array1<f64> {
        self.theta.column(0).to_owned()
    }

    /// Azimuth axis, taken from the first row.
    pub fn azimuth_axis(&self) -> Array1<f64> {
        self.phi.row(0).to_owned()
    }

    /// Step between the first two elevation and azimuth samples.
    ///
    /// Meaningful only for uniformly spaced grids. An axis with a single
    /// sample reports a step of zero.
    pub fn angular_resolution(&self) -> (f64, f64) {
        let (m, n) = self.dim();
        let resol_th = if m > 1 {
            self.theta[[1, 0]] - self.theta[[0, 0]]
        } else {
            0.0
        };
        let resol_ph = if n > 1 {
            self.phi[[0, 1]] - self.phi[[0, 0]]
        } else {
            0.0
        };
        (resol_th, resol_ph)
    }

    /// Wrap azimuths into [0, 2π) and sort the azimuth axis ascending.
    ///
    /// The elevation axis is assumed sorted already and is left alone. Any
    /// array indexed along this grid's azimuth must be reordered with the
    /// returned permutation.
    #[must_use = "co-indexed field arrays must be permuted too"]
    pub fn canonicalize(&mut self) -> AzimuthPermutation {
        self.phi.mapv_inplace(wrap_azimuth);
        let row0 = self.phi.row(0);
        let mut order: Vec<usize> = (0..row0.len()).collect();
        order.sort_by(|&a, &b| row0[a].total_cmp(&row0[b]));
        let perm = AzimuthPermutation(order);
        if !perm.is_identity() {
            self.phi = perm.apply(&self.phi);
        }
        perm
    }

    /// Rotate the grid a quarter turn about the z axis, then canonicalize.
    #[must_use = "co-indexed field arrays must be permuted too"]
    pub fn rotate90z(&mut self, sense: Sense) -> AzimuthPermutation {
        let shift = sense.sign() * FRAC_PI_2;
        self.phi.mapv_inplace(|p| p + shift);
        self.canonicalize()
    }

    /// Check that the two trailing dimensions of `array` match this grid.
    pub(crate) fn check_trailing<S, D>(&self, what: &'static str, array: &ArrayBase<S, D>) -> FieldResult<()>
    where
        S: Data,
        D: Dimension,
    {
        let (m, n) = self.dim();
        let shape = array.shape();
        let nd = shape.len();
        if nd < 2 || shape[nd - 2] != m || shape[nd - 1] != n {
            let mut expected = shape[..nd.saturating_sub(2)].to_vec();
            expected.extend([m, n]);
            return Err(FieldError::shape(what, &expected, shape));
        }
        Ok(())
    }
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|k| start + step * k as f64).collect()
        }
    }
}

fn azimuths(n: usize) -> Vec<f64> {
    (0..n).map(|k| TAU * k as f64 / n as f64).collect()
}
