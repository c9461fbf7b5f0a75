//! Jones patterns of dual-polarized antennas
//!
//! Two feeds `p` and `q` on the same element each radiate a tangential
//! field. At every direction they form a 2×2 Jones matrix
//!
//! ```text
//!        θ     φ
//! J = [ Fθ_p  Fφ_p ]   p
//!     [ Fθ_q  Fφ_q ]   q
//! ```
//!
//! whose singular values `σ₁ ≥ σ₂` give the amplitude gain and the intrinsic
//! cross-polarization ratio:
//!
//! ```text
//! g     = (σ₁ + σ₂) / 2
//! IXR_J = ((σ₁ + σ₂) / (σ₁ − σ₂))²
//! ```
//!
//! For a 2×2 matrix with `F = ‖J‖²_F` and `D = |det J|` these reduce to
//! `σ₁ ± σ₂ = √(F ± 2D)`.

use tracing::debug;

use crate::field::TangentialField;
use crate::source::FarFieldRequest;
use crate::types::{Complex, FieldError, FieldResult};

/// Feed channel of a dual-polarized element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    P,
    Q,
}

/// 2×2 Jones matrix, rows = channel (p, q), columns = component (θ, φ).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JonesMatrix(pub [[Complex; 2]; 2]);

impl JonesMatrix {
    pub fn determinant(&self) -> Complex {
        let m = &self.0;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Squared Frobenius norm.
    pub fn frobenius_sqr(&self) -> f64 {
        self.0.iter().flatten().map(|z| z.norm_sqr()).sum()
    }

    /// Singular values `(σ₁, σ₂)`, `σ₁ ≥ σ₂ ≥ 0`.
    pub fn singular_values(&self) -> (f64, f64) {
        let f = self.frobenius_sqr();
        let d2 = 2.0 * self.determinant().norm();
        let sum = (f + d2).sqrt();
        let diff = (f - d2).max(0.0).sqrt();
        ((sum + diff) / 2.0, (sum - diff) / 2.0)
    }
}

/// Amplitude gain and IXR_J of one Jones matrix.
///
/// IXR_J is infinite for a perfectly polarimetric matrix (σ₁ = σ₂) and NaN
/// for the zero matrix.
pub fn gain_and_ixr(jones: &JonesMatrix) -> (f64, f64) {
    let f = jones.frobenius_sqr();
    let d2 = 2.0 * jones.determinant().norm();
    let sum_sqr = f + d2;
    let diff_sqr = (f - d2).max(0.0);
    let g = sum_sqr.sqrt() / 2.0;
    let ixr = if diff_sqr > 0.0 {
        sum_sqr / diff_sqr
    } else if sum_sqr > 0.0 {
        f64::INFINITY
    } else {
        f64::NAN
    };
    (g, ixr)
}

/// Mueller-matrix IXR from IXR_J: `(1 + IXR_J)² / (4·IXR_J)`.
///
/// Both measures come from the same condition number `κ = σ₁/σ₂`, so
/// `IXR_M = ((κ² + 1)/(κ² − 1))²`. Infinite IXR_J maps to infinite IXR_M.
pub fn ixr_m(ixr_j: f64) -> f64 {
    if ixr_j.is_infinite() {
        return f64::INFINITY;
    }
    (1.0 + ixr_j).powi(2) / (4.0 * ixr_j)
}

/// Gains in dB (`20·log10`), optionally normalized to the peak.
pub fn gain_db(gains: &[f64], normalize: bool) -> Vec<f64> {
    let peak = if normalize {
        gains.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    } else {
        1.0
    };
    gains.iter().map(|g| 20.0 * (g / peak).log10()).collect()
}

/// IXR in dB (`10·log10`).
pub fn ixr_db(ixr: &[f64]) -> Vec<f64> {
    ixr.iter().map(|x| 10.0 * x.log10()).collect()
}

/// Fields of the two feeds, sampled on the same grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DualPolarizedField {
    p: TangentialField,
    q: TangentialField,
}

impl DualPolarizedField {
    pub fn new(p: TangentialField, q: TangentialField) -> FieldResult<Self> {
        if p.grid() != q.grid() {
            let (a, b) = (p.grid().dim(), q.grid().dim());
            return Err(FieldError::shape("q channel grid", &[a.0, a.1], &[b.0, b.1]));
        }
        if p.radii() != q.radii() {
            return Err(FieldError::Configuration(
                "p and q channels are sampled at different frequencies".to_string(),
            ));
        }
        Ok(Self { p, q })
    }

    /// Pair two simulation requests, one per feed.
    pub fn from_requests(p: &FarFieldRequest, q: &FarFieldRequest) -> FieldResult<Self> {
        debug!(p = %p.name, q = %q.name, "Pairing dual-polarized requests");
        Self::new(TangentialField::from_request(p)?, TangentialField::from_request(q)?)
    }

    pub fn field(&self, pol: Polarization) -> &TangentialField {
        match pol {
            Polarization::P => &self.p,
            Polarization::Q => &self.q,
        }
    }

    /// `(Fθ, Fφ)` of one channel at a stored radius, for plotting.
    pub fn channel(
        &self,
        pol: Polarization,
        radius: Option<f64>,
    ) -> FieldResult<(ndarray::ArrayView2<'_, Complex>, ndarray::ArrayView2<'_, Complex>)> {
        self.field(pol).components_at(radius)
    }

    /// Jones matrices at the given directions and (single) radius.
    pub fn jones_at(&self, thetas: &[f64], phis: &[f64], radius: Option<f64>) -> FieldResult<Vec<JonesMatrix>> {
        let radii = radius.as_ref().map(std::slice::from_ref);
        let (p_th, p_ph) = self.p.value_at(thetas, phis, radii)?;
        let (q_th, q_ph) = self.q.value_at(thetas, phis, radii)?;
        if p_th.nrows() != 1 {
            return Err(FieldError::RadiusRequired(p_th.nrows()));
        }
        Ok((0..thetas.len())
            .map(|k| {
                JonesMatrix([
                    [p_th[[0, k]], p_ph[[0, k]]],
                    [q_th[[0, k]], q_ph[[0, k]]],
                ])
            })
            .collect())
    }

    /// `(g, IXR_J)` at every direction.
    pub fn gain_and_ixr_at(&self, thetas: &[f64], phis: &[f64], radius: Option<f64>) -> FieldResult<(Vec<f64>, Vec<f64>)> {
        Ok(self
            .jones_at(thetas, phis, radius)?
            .iter()
            .map(gain_and_ixr)
            .unzip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::BasisType;
    use crate::grid::SphericalGrid;
    use ndarray::{Array2, Array3};

    const TOL: f64 = 1e-12;

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im)
    }

    #[test]
    fn test_identity_is_perfectly_polarimetric() {
        let j = JonesMatrix([[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]);
        let (g, ixr) = gain_and_ixr(&j);
        assert!((g - 1.0).abs() < TOL);
        assert!(ixr.is_infinite());
    }

    #[test]
    fn test_diagonal_gain_and_ixr() {
        let j = JonesMatrix([[c(3.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, 1.0)]]);
        let (s1, s2) = j.singular_values();
        assert!((s1 - 3.0).abs() < TOL);
        assert!((s2 - 1.0).abs() < TOL);
        let (g, ixr) = gain_and_ixr(&j);
        assert!((g - 2.0).abs() < TOL);
        assert!((ixr - 4.0).abs() < 1e-10);
        // κ = 3: ((9 + 1)/(9 - 1))²
        assert!((ixr_m(ixr) - 25.0 / 16.0).abs() < 1e-10);
    }

    #[test]
    fn test_ixr_m_limits() {
        assert!(ixr_m(f64::INFINITY).is_infinite());
        assert!((ixr_m(1.0) - 1.0).abs() < TOL);
        assert!(ixr_m(1.0e6) > ixr_m(1.0e3));
    }

    #[test]
    fn test_rank_one_has_unit_ixr() {
        let j = JonesMatrix([[c(1.0, 0.0), c(1.0, 0.0)], [c(2.0, 0.0), c(2.0, 0.0)]]);
        let (_, ixr) = gain_and_ixr(&j);
        assert!((ixr - 1.0).abs() < 1e-10);
        assert!(gain_and_ixr(&JonesMatrix([[c(0.0, 0.0); 2]; 2])).1.is_nan());
    }

    #[test]
    fn test_db_helpers() {
        let g = gain_db(&[1.0, 0.1], true);
        assert!(g[0].abs() < TOL);
        assert!((g[1] + 20.0).abs() < 1e-9);
        assert!((ixr_db(&[100.0])[0] - 20.0).abs() < 1e-9);
    }

    fn dual() -> DualPolarizedField {
        let grid = SphericalGrid::zenith_hemisphere(4, 8).unwrap();
        let one = Array2::from_elem(grid.dim(), c(1.0, 0.0));
        let zero = Array2::from_elem(grid.dim(), c(0.0, 0.0));
        let half = Array2::from_elem(grid.dim(), c(0.5, 0.0));
        let p = TangentialField::new(grid.clone(), one.clone(), zero.clone(), BasisType::Polar).unwrap();
        let q = TangentialField::new(grid, zero, half, BasisType::Polar).unwrap();
        DualPolarizedField::new(p, q).unwrap()
    }

    #[test]
    fn test_jones_assembled_per_direction() {
        let dp = dual();
        let js = dp.jones_at(&[0.2, 1.0], &[0.5, 5.0], None).unwrap();
        assert_eq!(js.len(), 2);
        assert!((js[1].0[0][0] - c(1.0, 0.0)).norm() < TOL);
        assert!((js[1].0[1][1] - c(0.5, 0.0)).norm() < TOL);
        let (g, ixr) = dp.gain_and_ixr_at(&[0.2], &[0.5], None).unwrap();
        assert!((g[0] - 0.75).abs() < TOL);
        assert!((ixr[0] - 9.0).abs() < 1e-9);
        let (th, _) = dp.channel(Polarization::Q, None).unwrap();
        assert_eq!(th[[0, 0]], c(0.0, 0.0));
    }

    #[test]
    fn test_mismatched_channels_rejected() {
        let g1 = SphericalGrid::zenith_hemisphere(4, 8).unwrap();
        let g2 = SphericalGrid::zenith_hemisphere(5, 8).unwrap();
        let f1 = Array2::from_elem(g1.dim(), c(1.0, 0.0));
        let f2 = Array2::from_elem(g2.dim(), c(1.0, 0.0));
        let p = TangentialField::new(g1, f1.clone(), f1, BasisType::Polar).unwrap();
        let q = TangentialField::new(g2, f2.clone(), f2, BasisType::Polar).unwrap();
        assert!(DualPolarizedField::new(p, q).is_err());
    }

    #[test]
    fn test_multi_frequency_needs_radius() {
        let grid = SphericalGrid::zenith_hemisphere(3, 4).unwrap();
        let f = Array3::from_elem((2, 3, 4), c(1.0, 0.0));
        let mk = || {
            TangentialField::with_radial_axis(grid.clone(), vec![1.0, 2.0], f.clone(), f.clone(), BasisType::Polar)
                .unwrap()
        };
        let dp = DualPolarizedField::new(mk(), mk()).unwrap();
        assert_eq!(
            dp.jones_at(&[0.1], &[0.1], None).unwrap_err(),
            FieldError::RadiusRequired(2)
        );
        assert_eq!(dp.jones_at(&[0.1], &[0.1], Some(1.5)).unwrap().len(), 1);
    }
}
