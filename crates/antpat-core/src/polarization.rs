//! Polarization bases for tangential field components
//!
//! Three component bases are supported:
//!
//! - **Spherical** `(θ, φ)`: components along the local elevation and
//!   azimuth unit vectors.
//! - **Ludwig-3** `(u, v)`: the co/cross-polar reporting basis of Ludwig
//!   (1973), related to the spherical one by a rotation through the azimuth.
//! - **Circular** `(L, R)`: `E0 = (Fθ + i·Fφ)/√2`, `E1 = (Fθ − i·Fφ)/√2`.
//!
//! ```text
//! Fu = Fθ·sin φ + Fφ·cos φ        Fθ = Fu·sin φ + Fv·cos φ
//! Fv = Fθ·cos φ − Fφ·sin φ        Fφ = Fu·cos φ − Fv·sin φ
//! ```
//!
//! The Ludwig-3 map is an involution (it is a reflection, not a rotation), so
//! the same coefficients convert in both directions.

use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use std::f64::consts::FRAC_1_SQRT_2;

use crate::types::{Complex, FieldError, FieldResult};

/// Spherical to Ludwig-3 at a single azimuth.
#[inline]
pub fn sph_to_ludwig3_point(az: f64, f_th: Complex, f_ph: Complex) -> (Complex, Complex) {
    let (s, c) = az.sin_cos();
    (f_th * s + f_ph * c, f_th * c - f_ph * s)
}

/// Ludwig-3 to spherical at a single azimuth.
#[inline]
pub fn ludwig3_to_sph_point(az: f64, f_u: Complex, f_v: Complex) -> (Complex, Complex) {
    let (s, c) = az.sin_cos();
    (f_u * s + f_v * c, f_u * c - f_v * s)
}

/// Spherical to circular `(E0, E1)`.
#[inline]
pub fn sph_to_circular_point(f_th: Complex, f_ph: Complex) -> (Complex, Complex) {
    let i_ph = Complex::i() * f_ph;
    ((f_th + i_ph) * FRAC_1_SQRT_2, (f_th - i_ph) * FRAC_1_SQRT_2)
}

/// Element-wise spherical to Ludwig-3 conversion.
pub fn sph_to_ludwig3<S1, S2, S3, D>(
    az: &ArrayBase<S1, D>,
    f_th: &ArrayBase<S2, D>,
    f_ph: &ArrayBase<S3, D>,
) -> FieldResult<(Array<Complex, D>, Array<Complex, D>)>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = Complex>,
    S3: Data<Elem = Complex>,
    D: Dimension,
{
    map_pair(az, f_th, f_ph, sph_to_ludwig3_point)
}

/// Element-wise Ludwig-3 to spherical conversion.
pub fn ludwig3_to_sph<S1, S2, S3, D>(
    az: &ArrayBase<S1, D>,
    f_u: &ArrayBase<S2, D>,
    f_v: &ArrayBase<S3, D>,
) -> FieldResult<(Array<Complex, D>, Array<Complex, D>)>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = Complex>,
    S3: Data<Elem = Complex>,
    D: Dimension,
{
    map_pair(az, f_u, f_v, ludwig3_to_sph_point)
}

/// Element-wise spherical to circular conversion.
pub fn sph_to_circular<S1, S2, D>(
    f_th: &ArrayBase<S1, D>,
    f_ph: &ArrayBase<S2, D>,
) -> FieldResult<(Array<Complex, D>, Array<Complex, D>)>
where
    S1: Data<Elem = Complex>,
    S2: Data<Elem = Complex>,
    D: Dimension,
{
    if f_th.shape() != f_ph.shape() {
        return Err(FieldError::shape("second component", f_th.shape(), f_ph.shape()));
    }
    let mut e0 = f_th.to_owned();
    let mut e1 = f_ph.to_owned();
    Zip::from(&mut e0).and(&mut e1).for_each(|a, b| {
        let (l, r) = sph_to_circular_point(*a, *b);
        *a = l;
        *b = r;
    });
    Ok((e0, e1))
}

fn map_pair<S1, S2, S3, D, F>(
    az: &ArrayBase<S1, D>,
    f0: &ArrayBase<S2, D>,
    f1: &ArrayBase<S3, D>,
    op: F,
) -> FieldResult<(Array<Complex, D>, Array<Complex, D>)>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = Complex>,
    S3: Data<Elem = Complex>,
    D: Dimension,
    F: Fn(f64, Complex, Complex) -> (Complex, Complex),
{
    if f0.shape() != az.shape() {
        return Err(FieldError::shape("first component", az.shape(), f0.shape()));
    }
    if f1.shape() != az.shape() {
        return Err(FieldError::shape("second component", az.shape(), f1.shape()));
    }
    let mut out0 = f0.to_owned();
    let mut out1 = f1.to_owned();
    Zip::from(&mut out0)
        .and(&mut out1)
        .and(az)
        .for_each(|a, b, &phi| {
            let (x, y) = op(phi, *a, *b);
            *a = x;
            *b = y;
        });
    Ok((out0, out1))
}
