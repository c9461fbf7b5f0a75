//! Periodic extension of a field across the azimuth seam
//!
//! Regular-grid interpolation only sees the samples between the first and
//! last azimuth column, so a query at 359° on a grid sampled every 90° would
//! fall outside the 0°..270° axis. Padding the azimuth axis with one wrapped
//! column on each side fixes this:
//!
//! ```text
//! stored:    φ0   φ1  ...  φ(N-1)
//! extended:  φ(N-1)-2π   φ0   φ1  ...  φ(N-1)   φ0+2π
//! field:     F[.., N-1]  F[.., 0] ...  F[.., N-1]  F[.., 0]
//! ```
//!
//! Elevation spans [0, π] and is not periodic, so it is not extended.

use ndarray::{concatenate, Array, Array1, ArrayBase, Axis, Data, Dimension, RemoveAxis, Slice};
use std::f64::consts::TAU;

use crate::grid::SphericalGrid;
use crate::types::{FieldError, FieldResult};

/// Interpolation axes of a periodically extended grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicAxes {
    /// Elevation axis, length M
    pub theta: Array1<f64>,
    /// Azimuth axis with the wrapped neighbours, length N + 2
    pub phi: Array1<f64>,
}

/// Extend the azimuth axis of `grid` and the last axis of both field arrays.
///
/// The field arrays may carry any number of leading axes (e.g. a radial
/// axis); their two trailing dimensions must match the grid.
pub fn periodify<A, S1, S2, D>(
    grid: &SphericalGrid,
    f1: &ArrayBase<S1, D>,
    f2: &ArrayBase<S2, D>,
) -> FieldResult<(PeriodicAxes, Array<A, D>, Array<A, D>)>
where
    A: Clone,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension + RemoveAxis,
{
    grid.check_trailing("F1", f1)?;
    grid.check_trailing("F2", f2)?;

    let theta = grid.elevation_axis();
    let phi0 = grid.azimuth_axis();
    let n = phi0.len();

    let mut phi = Array1::zeros(n + 2);
    phi[0] = phi0[n - 1] - TAU;
    phi.slice_mut(ndarray::s![1..=n]).assign(&phi0);
    phi[n + 1] = phi0[0] + TAU;

    let axes = PeriodicAxes { theta, phi };
    Ok((axes, wrap_last_axis(f1)?, wrap_last_axis(f2)?))
}

fn wrap_last_axis<A, S, D>(f: &ArrayBase<S, D>) -> FieldResult<Array<A, D>>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension + RemoveAxis,
{
    let last = Axis(f.ndim() - 1);
    let n = f.len_of(last);
    let tail = f.slice_axis(last, Slice::from(n - 1..));
    let head = f.slice_axis(last, Slice::from(0..1));
    concatenate(last, &[tail, f.view(), head]).map_err(|_| {
        let mut expected = f.shape().to_vec();
        expected[last.index()] = n + 2;
        FieldError::shape("periodic extension", &expected, f.shape())
    })
}
