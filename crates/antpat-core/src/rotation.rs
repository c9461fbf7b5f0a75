//! Parallactic re-expression of tangential fields between rotated frames
//!
//! A field sampled at directions given in a source frame A is re-expressed
//! in the tangential basis of the same physical points as seen from a frame
//! B, where `rotation` maps A coordinates to B coordinates.
//!
//! Per sample:
//!
//! ```text
//! xyz    = sph_to_cart(θ, φ)            point in A
//! xyz_to = R · xyz                       same point in B
//! S      = basis(xyz),  S_to = basis(xyz_to)        (ISO order)
//! P      = S[:, θφ]ᵀ · (Rᵀ · S_to)[:, θφ]          2×2
//! [Fθ' Fφ']ᵀ = P · [Fθ Fφ]ᵀ
//! ```
//!
//! Both tangential bases span the same tangent plane, so `P` is orthogonal
//! and the field magnitude is preserved. Rotations about z map θ̂ onto θ̂ and
//! leave the components unchanged.

use crate::angles::sph_to_cart;
use crate::basis::{basis_at_point, BasisOrder};
use crate::linalg::Mat3;
use crate::types::{Complex, FieldError, FieldResult};

/// 2×2 in-plane rotation for a single sample, rows/cols ordered (θ, φ).
pub type ParallacticMatrix = [[f64; 2]; 2];

/// Parallactic matrices for each sample direction.
pub fn parallactic_matrices(
    rotation: &Mat3,
    thetas: &[f64],
    phis: &[f64],
) -> FieldResult<Vec<ParallacticMatrix>> {
    if thetas.len() != phis.len() {
        return Err(FieldError::shape("phis", &[thetas.len()], &[phis.len()]));
    }
    let rot_t = rotation.transpose();
    thetas
        .iter()
        .zip(phis)
        .map(|(&theta, &phi)| {
            let xyz = sph_to_cart(theta, phi);
            let xyz_to = rotation.mul_vec(&xyz);
            let from = basis_at_point(&xyz, BasisOrder::Iso)?.matrix;
            let from_to = rot_t.mul_mat(&basis_at_point(&xyz_to, BasisOrder::Iso)?.matrix);
            let mut par = [[0.0; 2]; 2];
            for (i, row) in par.iter_mut().enumerate() {
                for (j, p) in row.iter_mut().enumerate() {
                    *p = from.column(i + 1).dot(&from_to.column(j + 1));
                }
            }
            Ok(par)
        })
        .collect()
}

/// Re-express `(Fθ, Fφ)` sampled at `(thetas, phis)` in the rotated frame.
pub fn reexpress(
    rotation: &Mat3,
    thetas: &[f64],
    phis: &[f64],
    f_th: &[Complex],
    f_ph: &[Complex],
) -> FieldResult<(Vec<Complex>, Vec<Complex>)> {
    let n = thetas.len();
    if f_th.len() != n {
        return Err(FieldError::shape("Ftheta", &[n], &[f_th.len()]));
    }
    if f_ph.len() != n {
        return Err(FieldError::shape("Fphi", &[n], &[f_ph.len()]));
    }
    let pars = parallactic_matrices(rotation, thetas, phis)?;
    let mut out_th = Vec::with_capacity(n);
    let mut out_ph = Vec::with_capacity(n);
    for ((p, &a), &b) in pars.iter().zip(f_th).zip(f_ph) {
        out_th.push(a * p[0][0] + b * p[0][1]);
        out_ph.push(a * p[1][0] + b * p[1][1]);
    }
    Ok((out_th, out_ph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-12;

    fn samples() -> (Vec<f64>, Vec<f64>, Vec<Complex>, Vec<Complex>) {
        let mut thetas = Vec::new();
        let mut phis = Vec::new();
        let mut f_th = Vec::new();
        let mut f_ph = Vec::new();
        for k in 1..6 {
            for l in 0..8 {
                let (t, p) = (k as f64 * PI / 6.0, l as f64 * PI / 4.0 + 0.05);
                thetas.push(t);
                phis.push(p);
                f_th.push(Complex::new(t.cos(), p.sin()));
                f_ph.push(Complex::new(-p.cos(), 0.5 * t));
            }
        }
        (thetas, phis, f_th, f_ph)
    }

    #[test]
    fn test_identity_rotation_is_noop() {
        let (thetas, phis, f_th, f_ph) = samples();
        let (th, ph) = reexpress(&Mat3::identity(), &thetas, &phis, &f_th, &f_ph).unwrap();
        for k in 0..thetas.len() {
            assert!((th[k] - f_th[k]).norm() < TOL);
            assert!((ph[k] - f_ph[k]).norm() < TOL);
        }
    }

    #[test]
    fn test_rotation_about_z_is_noop() {
        let (thetas, phis, f_th, f_ph) = samples();
        let rz = Mat3::rotation_z(0.8);
        let (th, ph) = reexpress(&rz, &thetas, &phis, &f_th, &f_ph).unwrap();
        for k in 0..thetas.len() {
            assert!((th[k] - f_th[k]).norm() < 1e-10);
            assert!((ph[k] - f_ph[k]).norm() < 1e-10);
        }
    }

    #[test]
    fn test_tilted_frame_preserves_magnitude() {
        let (thetas, phis, f_th, f_ph) = samples();
        let rot = Mat3::from_euler_zyx(0.3, 0.4, -0.2);
        let pars = parallactic_matrices(&rot, &thetas, &phis).unwrap();
        for p in &pars {
            let det = p[0][0] * p[1][1] - p[0][1] * p[1][0];
            assert!((det.abs() - 1.0).abs() < 1e-10, "det {}", det);
        }
        let (th, ph) = reexpress(&rot, &thetas, &phis, &f_th, &f_ph).unwrap();
        for k in 0..thetas.len() {
            let before = f_th[k].norm_sqr() + f_ph[k].norm_sqr();
            let after = th[k].norm_sqr() + ph[k].norm_sqr();
            assert!((before - after).abs() < 1e-10);
        }
        let moved = (0..thetas.len()).any(|k| (th[k] - f_th[k]).norm() > 1e-3);
        assert!(moved, "tilt should mix components somewhere");
    }

    #[test]
    fn test_rotation_onto_pole_is_singular() {
        // x axis rotated onto z by -90° about y
        let rot = Mat3::rotation_y(-PI / 2.0);
        let one = [Complex::new(1.0, 0.0)];
        let err = reexpress(&rot, &[PI / 2.0], &[0.0], &one, &one).unwrap_err();
        assert!(matches!(err, FieldError::SingularGeometry { .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let one = [Complex::new(1.0, 0.0)];
        assert!(reexpress(&Mat3::identity(), &[0.5, 0.6], &[0.0, 0.1], &one, &one).is_err());
    }
}
