//! Angle branch reduction and spherical/Cartesian point conversion
//!
//! Directions are given as ISO spherical angles: elevation `theta` measured
//! from the +z axis, azimuth `phi` measured from +x towards +y. All angles
//! are in radians.
//!
//! ## Principal Branch
//!
//! ```text
//! phi   -> phi - floor(phi / 2π)·2π         in [0, 2π)
//! theta -> | |theta| - round(|theta| / 2π)·2π |   in [0, π]
//! ```
//!
//! Elevations past π are reflected back without shifting the azimuth by π,
//! so for such inputs the reduced pair names a different direction than the
//! input. Callers who need the geometric identity must fold it themselves.

use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use std::f64::consts::TAU;

use crate::linalg::Vec3;

/// A reduced (elevation, azimuth) pair in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAngle {
    /// Elevation in [0, π]
    pub theta: f64,
    /// Azimuth in [0, 2π)
    pub phi: f64,
}

impl PrincipalAngle {
    /// Reduce an arbitrary pair to its principal branch.
    pub fn new(theta: f64, phi: f64) -> Self {
        let (theta, phi) = principal_branch(theta, phi);
        Self { theta, phi }
    }

    /// Cartesian unit vector for this direction.
    pub fn to_cartesian(&self) -> Vec3 {
        sph_to_cart(self.theta, self.phi)
    }
}

/// Wrap an azimuth into [0, 2π).
#[inline]
pub fn wrap_azimuth(phi: f64) -> f64 {
    let branch = (phi / TAU).floor();
    let wrapped = phi - branch * TAU;
    // floor can leave a tiny negative input sitting exactly on 2π
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Reflect an elevation onto the nearest principal value.
#[inline]
pub fn reflect_elevation(theta: f64) -> f64 {
    let theta = theta.abs();
    let branch = (theta / TAU).round();
    (theta - branch * TAU).abs()
}

/// Reduce `(theta, phi)` to the principal branch.
#[inline]
pub fn principal_branch(theta: f64, phi: f64) -> (f64, f64) {
    (reflect_elevation(theta), wrap_azimuth(phi))
}

/// Element-wise [`principal_branch`] over arrays of any (equal) shape.
///
/// # Panics
///
/// Panics if `theta` and `phi` differ in shape.
pub fn principal_branch_array<S1, S2, D>(
    theta: &ArrayBase<S1, D>,
    phi: &ArrayBase<S2, D>,
) -> (Array<f64, D>, Array<f64, D>)
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let mut theta_pb = theta.to_owned();
    let mut phi_pb = phi.to_owned();
    Zip::from(&mut theta_pb)
        .and(&mut phi_pb)
        .for_each(|t, p| {
            let (tr, pr) = principal_branch(*t, *p);
            *t = tr;
            *p = pr;
        });
    (theta_pb, phi_pb)
}

/// ISO spherical direction to a Cartesian unit vector.
#[inline]
pub fn sph_to_cart(theta: f64, phi: f64) -> Vec3 {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    Vec3::new(st * cp, st * sp, ct)
}

/// Cartesian vector to ISO spherical `(theta, phi)`, azimuth in [0, 2π).
///
/// The zero vector maps to `(0, 0)`.
pub fn cart_to_sph(v: &Vec3) -> (f64, f64) {
    let rho = (v.x * v.x + v.y * v.y).sqrt();
    let theta = rho.atan2(v.z);
    let phi = wrap_azimuth(v.y.atan2(v.x));
    (theta, phi)
}

/// Convert an array of degrees to radians.
pub fn deg2rad<S, D>(deg: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    deg.mapv(f64::to_radians)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_azimuth_always_in_range() {
        let samples = [
            -1e-17,
            -1e-300,
            -TAU,
            -7.5 * PI,
            0.0,
            TAU,
            TAU - 1e-15,
            3.0 * TAU + 0.25,
            1e6,
            -1e6,
        ];
        for &phi in &samples {
            let (_, p) = principal_branch(0.5, phi);
            assert!((0.0..TAU).contains(&p), "phi={} reduced to {}", phi, p);
        }
    }

    #[test]
    fn test_azimuth_wrap_values() {
        assert!((wrap_azimuth(-FRAC_PI_2) - 1.5 * PI).abs() < TOL);
        assert!((wrap_azimuth(TAU + 0.25) - 0.25).abs() < TOL);
        assert_eq!(wrap_azimuth(TAU), 0.0);
    }

    #[test]
    fn test_elevation_reflection() {
        assert!((reflect_elevation(-0.3) - 0.3).abs() < TOL);
        assert!((reflect_elevation(TAU + 0.2) - 0.2).abs() < TOL);
        // reflected, azimuth untouched
        let (t, p) = principal_branch(1.5 * PI, 0.4);
        assert!((t - FRAC_PI_2).abs() < TOL);
        assert!((p - 0.4).abs() < TOL);
        let reduced = PrincipalAngle::new(1.5 * PI, 0.4 - TAU);
        assert!((reduced.theta - FRAC_PI_2).abs() < TOL);
        assert!((reduced.phi - 0.4).abs() < TOL);
        let v = reduced.to_cartesian();
        assert!((v.magnitude() - 1.0).abs() < TOL && v.z.abs() < TOL);
        assert!((reflect_elevation(PI) - PI).abs() < TOL);
    }

    #[test]
    fn test_array_reduction_matches_scalar() {
        let theta = array![[-0.1, 7.0], [3.0, 12.0]];
        let phi = array![[-1.0, 7.0], [20.0, -0.5]];
        let (t, p) = principal_branch_array(&theta, &phi);
        for ((i, j), &v) in t.indexed_iter() {
            let (ts, ps) = principal_branch(theta[[i, j]], phi[[i, j]]);
            assert_eq!(v, ts);
            assert_eq!(p[[i, j]], ps);
        }
    }

    #[test]
    fn test_cart_sph_round_trip() {
        let (theta, phi) = (1.1, 4.0);
        let v = sph_to_cart(theta, phi);
        assert!((v.magnitude() - 1.0).abs() < TOL);
        let (t, p) = cart_to_sph(&v.scale(3.0));
        assert!((t - theta).abs() < 1e-12);
        assert!((p - phi).abs() < 1e-12);
    }

    #[test]
    fn test_deg2rad() {
        let r = deg2rad(&array![0.0, 90.0, 180.0]);
        assert!((r[1] - FRAC_PI_2).abs() < TOL);
        assert!((r[2] - PI).abs() < TOL);
    }
}
