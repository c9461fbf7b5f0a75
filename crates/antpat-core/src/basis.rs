//! Local spherical basis matrices
//!
//! For a direction `(x, y, z)` with unit vector `(xu, yu, zu)` and
//! `ρ = √(xu² + yu²)` the local basis vectors are
//!
//! ```text
//! r̂ = (xu, yu, zu)
//! φ̂ = (yu, −xu, 0) / ρ
//! θ̂ = (xu·zu, yu·zu, −ρ²) / ρ
//! ```
//!
//! and the spherical→Cartesian matrix has these as columns, rows being the
//! Cartesian x, y, z components:
//!
//! ```text
//! [v_x v_y v_z]ᵀ = M · [v_r v_θ v_φ]ᵀ     (ISO order)
//! [v_x v_y v_z]ᵀ = M · [v_r v_φ v_θ]ᵀ     (non-ISO order)
//! ```
//!
//! Note that `φ̂` as written points towards *decreasing* azimuth. The
//! transposed-input builder ([`basis_at_transposed`]) flips it in non-ISO
//! order; both conventions are relied upon by callers and must not be
//! unified.
//!
//! At the poles `ρ = 0` and the tangential vectors are undefined; such
//! directions are rejected with [`FieldError::SingularGeometry`].

use ndarray::ArrayView2;

use crate::angles::sph_to_cart;
use crate::linalg::{Mat3, Vec3};
use crate::types::{Complex, FieldError, FieldResult};

/// Below this horizontal extent (of the unit vector) a direction is a pole.
pub const POLE_EPS: f64 = 1e-12;

/// Column ordering of a [`BasisMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasisOrder {
    /// (r, θ, φ)
    #[default]
    Iso,
    /// (r, φ, θ)
    NonIso,
}

/// Spherical→Cartesian transform at one sample direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisMatrix {
    pub order: BasisOrder,
    /// Columns are the local basis vectors in `order`.
    pub matrix: Mat3,
}

impl BasisMatrix {
    pub fn radial(&self) -> Vec3 {
        self.matrix.column(0)
    }

    pub fn elevation(&self) -> Vec3 {
        match self.order {
            BasisOrder::Iso => self.matrix.column(1),
            BasisOrder::NonIso => self.matrix.column(2),
        }
    }

    pub fn azimuthal(&self) -> Vec3 {
        match self.order {
            BasisOrder::Iso => self.matrix.column(2),
            BasisOrder::NonIso => self.matrix.column(1),
        }
    }

    /// The two tangential columns (1 and 2) in matrix order.
    pub fn tangential(&self) -> (Vec3, Vec3) {
        (self.matrix.column(1), self.matrix.column(2))
    }
}

/// `(r̂, θ̂, φ̂)` at `dir`, with `φ̂ = (yu, −xu, 0)/ρ`.
fn local_vectors(dir: &Vec3) -> FieldResult<(Vec3, Vec3, Vec3)> {
    let singular = || FieldError::SingularGeometry {
        x: dir.x,
        y: dir.y,
        z: dir.z,
    };
    let rabs = dir.magnitude();
    if !(rabs > 0.0) || !rabs.is_finite() {
        return Err(singular());
    }
    let u = dir.scale(1.0 / rabs);
    let rho2 = u.x * u.x + u.y * u.y;
    let rho = rho2.sqrt();
    if rho < POLE_EPS {
        return Err(singular());
    }
    let angnrm = 1.0 / rho;
    let phib = Vec3::new(u.y, -u.x, 0.0).scale(angnrm);
    let thetab = Vec3::new(u.x * u.z, u.y * u.z, -rho2).scale(angnrm);
    Ok((u, thetab, phib))
}

/// Basis matrix at a single direction (need not be unit length).
pub fn basis_at_point(dir: &Vec3, order: BasisOrder) -> FieldResult<BasisMatrix> {
    let (rb, thetab, phib) = local_vectors(dir)?;
    let matrix = match order {
        BasisOrder::Iso => Mat3::from_columns(rb, thetab, phib),
        BasisOrder::NonIso => Mat3::from_columns(rb, phib, thetab),
    };
    Ok(BasisMatrix { order, matrix })
}

/// Basis matrices for directions stored as rows of an `(N, 3)` array.
pub fn basis_at(dirs: ArrayView2<f64>, order: BasisOrder) -> FieldResult<Vec<BasisMatrix>> {
    if dirs.ncols() != 3 {
        return Err(FieldError::shape("direction rows", &[dirs.nrows(), 3], dirs.shape()));
    }
    dirs.rows()
        .into_iter()
        .map(|r| basis_at_point(&Vec3::new(r[0], r[1], r[2]), order))
        .collect()
}

/// Basis matrices for directions stored as columns of a `(3, N)` array.
///
/// Identical to [`basis_at`] in ISO order. In non-ISO order the azimuthal
/// column is negated, giving the `φ̂` of increasing azimuth.
pub fn basis_at_transposed(dirs: ArrayView2<f64>, order: BasisOrder) -> FieldResult<Vec<BasisMatrix>> {
    if dirs.nrows() != 3 {
        return Err(FieldError::shape("direction columns", &[3, dirs.ncols()], dirs.shape()));
    }
    dirs.columns()
        .into_iter()
        .map(|c| {
            let (rb, thetab, phib) = local_vectors(&Vec3::new(c[0], c[1], c[2]))?;
            let matrix = match order {
                BasisOrder::Iso => Mat3::from_columns(rb, thetab, phib),
                BasisOrder::NonIso => Mat3::from_columns(rb, phib.scale(-1.0), thetab),
            };
            Ok(BasisMatrix { order, matrix })
        })
        .collect()
}

/// Express a tangential field as Cartesian complex vectors.
///
/// Each sample `(Fθ, Fφ)` at `(θ, φ)` is mapped through the transposed-input
/// non-ISO basis with a zero radial component, i.e. `Fθ·θ̂ + Fφ·φ̂` with
/// `φ̂` towards increasing azimuth.
pub fn tangential_to_cartesian(
    thetas: &[f64],
    phis: &[f64],
    f_th: &[Complex],
    f_ph: &[Complex],
) -> FieldResult<Vec<[Complex; 3]>> {
    let n = thetas.len();
    for (what, len) in [("phis", phis.len()), ("Ftheta", f_th.len()), ("Fphi", f_ph.len())] {
        if len != n {
            return Err(FieldError::shape(what, &[n], &[len]));
        }
    }
    let dirs = ndarray::Array2::from_shape_fn((3, n), |(c, k)| {
        sph_to_cart(thetas[k], phis[k]).to_array()[c]
    });
    let bases = basis_at_transposed(dirs.view(), BasisOrder::NonIso)?;
    Ok(bases
        .iter()
        .zip(f_th.iter().zip(f_ph))
        .map(|(b, (&eth, &eph))| {
            // [E_r, E_φ, E_θ] with E_r = 0
            let m = &b.matrix.m;
            [
                eph * m[0][1] + eth * m[0][2],
                eph * m[1][1] + eth * m[1][2],
                eph * m[2][1] + eth * m[2][2],
            ]
        })
        .collect())
}
