//! Multilinear interpolation on a rectilinear grid
//!
//! Each axis is a strictly ascending 1-D coordinate array; the value array
//! has one dimension per axis. A query point is located in its enclosing
//! cell by binary search on every axis and the `2^d` cell corners are blended
//! with the usual tensor-product linear weights:
//!
//! ```text
//! f(x) = Σ_corners Π_k ( t_k if corner_k = hi else 1 - t_k ) · F[corner]
//! ```
//!
//! The result is exact at grid nodes and linear along every axis in between.
//! Queries outside an axis are rejected with [`FieldError::OutOfDomain`];
//! there is no extrapolation. A coordinate a few ulps past an end point (as
//! produced by degree→radian conversion) is accepted as the end point.

use ndarray::{Array1, ArrayD, ArrayView2, IxDyn};

use crate::types::{Complex, FieldError, FieldResult};

/// Relative slack for end-point comparisons.
const EDGE_EPS: f64 = 1e-12;

/// A named, strictly ascending coordinate axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxis {
    pub name: &'static str,
    pub points: Array1<f64>,
}

impl GridAxis {
    pub fn new(name: &'static str, points: Array1<f64>) -> Self {
        Self { name, points }
    }

    /// Enclosing cell `(lo, hi, t)` of `x`.
    fn locate(&self, x: f64) -> FieldResult<(usize, usize, f64)> {
        let pts = &self.points;
        let n = pts.len();
        let (min, max) = (pts[0], pts[n - 1]);
        let slack = EDGE_EPS * (1.0 + min.abs().max(max.abs()));
        if !(x >= min - slack && x <= max + slack) {
            return Err(FieldError::OutOfDomain {
                axis: self.name,
                value: x,
                min,
                max,
            });
        }
        if n == 1 {
            return Ok((0, 0, 0.0));
        }
        let x = x.clamp(min, max);
        let count = pts.as_slice().map_or_else(
            || pts.iter().take_while(|&&a| a <= x).count(),
            |s| s.partition_point(|&a| a <= x),
        );
        let lo = count.saturating_sub(1).min(n - 2);
        let t = (x - pts[lo]) / (pts[lo + 1] - pts[lo]);
        Ok((lo, lo + 1, t))
    }
}

/// Linear interpolator over a regular (rectilinear) grid of complex values.
#[derive(Debug, Clone)]
pub struct RegularGridInterpolator {
    axes: Vec<GridAxis>,
    values: ArrayD<Complex>,
}

impl RegularGridInterpolator {
    /// Create an interpolator, validating axis lengths and ordering.
    pub fn new(axes: Vec<GridAxis>, values: ArrayD<Complex>) -> FieldResult<Self> {
        let expected: Vec<usize> = axes.iter().map(|a| a.points.len()).collect();
        if expected.as_slice() != values.shape() {
            return Err(FieldError::shape("interpolation values", &expected, values.shape()));
        }
        for axis in &axes {
            if axis.points.is_empty() {
                return Err(FieldError::shape(axis.name, &[1], &[0]));
            }
            let ascending = axis
                .points
                .iter()
                .zip(axis.points.iter().skip(1))
                .all(|(a, b)| a < b);
            if !ascending {
                return Err(FieldError::NonMonotonicAxis(axis.name));
            }
        }
        Ok(Self { axes, values })
    }

    /// Number of axes, which is also the length of a query point.
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Interpolate at a single point with one coordinate per axis.
    pub fn evaluate(&self, point: &[f64]) -> FieldResult<Complex> {
        let d = self.axes.len();
        if point.len() != d {
            return Err(FieldError::shape("query point", &[d], &[point.len()]));
        }
        let cells = self
            .axes
            .iter()
            .zip(point)
            .map(|(axis, &x)| axis.locate(x))
            .collect::<FieldResult<Vec<_>>>()?;

        let mut acc = Complex::new(0.0, 0.0);
        let mut index = vec![0usize; d];
        for corner in 0..(1usize << d) {
            let mut weight = 1.0;
            for (k, &(lo, hi, t)) in cells.iter().enumerate() {
                if corner & (1 << k) != 0 {
                    weight *= t;
                    index[k] = hi;
                } else {
                    weight *= 1.0 - t;
                    index[k] = lo;
                }
            }
            if weight != 0.0 {
                acc += self.values[IxDyn(&index)] * weight;
            }
        }
        Ok(acc)
    }

    /// Interpolate at every row of `points` (shape `(n_points, ndim)`).
    pub fn evaluate_many(&self, points: ArrayView2<f64>) -> FieldResult<Array1<Complex>> {
        let mut out = Array1::from_elem(points.nrows(), Complex::new(0.0, 0.0));
        let mut coords = vec![0.0; points.ncols()];
        for (k, row) in points.rows().into_iter().enumerate() {
            for (c, &v) in coords.iter_mut().zip(row.iter()) {
                *c = v;
            }
            out[k] = self.evaluate(&coords)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};

    const TOL: f64 = 1e-12;

    fn c(re: f64) -> Complex {
        Complex::new(re, 0.0)
    }

    fn plane() -> RegularGridInterpolator {
        // f(x, y) = 2x + 3y + i·x, on an irregular x axis
        let xs = array![0.0, 1.0, 3.0];
        let ys = array![-1.0, 0.0, 2.0, 5.0];
        let values = Array2::from_shape_fn((3, 4), |(i, j)| {
            Complex::new(2.0 * xs[i] + 3.0 * ys[j], xs[i])
        });
        RegularGridInterpolator::new(
            vec![GridAxis::new("x", xs), GridAxis::new("y", ys)],
            values.into_dyn(),
        )
        .unwrap()
    }

    #[test]
    fn test_exact_at_nodes() {
        let interp = plane();
        assert_eq!(interp.ndim(), 2);
        let v = interp.evaluate(&[3.0, 2.0]).unwrap();
        assert!((v - Complex::new(12.0, 3.0)).norm() < TOL);
        let v = interp.evaluate(&[0.0, -1.0]).unwrap();
        assert!((v - Complex::new(-3.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_linear_between_nodes() {
        let interp = plane();
        let v = interp.evaluate(&[2.2, 3.5]).unwrap();
        assert!((v - Complex::new(4.4 + 10.5, 2.2)).norm() < 1e-10, "got {}", v);
    }

    #[test]
    fn test_out_of_domain() {
        let interp = plane();
        let err = interp.evaluate(&[3.5, 0.0]).unwrap_err();
        match err {
            FieldError::OutOfDomain { axis, value, .. } => {
                assert_eq!(axis, "x");
                assert_eq!(value, 3.5);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(interp.evaluate(&[0.5, f64::NAN]).is_err());
    }

    #[test]
    fn test_end_point_slack() {
        let interp = plane();
        assert!(interp.evaluate(&[3.0 + 1e-15, 5.0]).is_ok());
    }

    #[test]
    fn test_single_sample_axis() {
        let values = Array3::from_shape_fn((1, 2, 2), |(_, i, j)| c((i + 2 * j) as f64));
        let interp = RegularGridInterpolator::new(
            vec![
                GridAxis::new("radius", array![5.0]),
                GridAxis::new("theta", array![0.0, 1.0]),
                GridAxis::new("phi", array![0.0, 1.0]),
            ],
            values.into_dyn(),
        )
        .unwrap();
        let v = interp.evaluate(&[5.0, 0.5, 0.5]).unwrap();
        assert!((v - c(1.5)).norm() < TOL);
        assert!(matches!(
            interp.evaluate(&[6.0, 0.5, 0.5]),
            Err(FieldError::OutOfDomain { axis: "radius", .. })
        ));
    }

    #[test]
    fn test_rejects_descending_axis() {
        let err = RegularGridInterpolator::new(
            vec![GridAxis::new("theta", array![1.0, 0.0])],
            array![c(0.0), c(1.0)].into_dyn(),
        )
        .unwrap_err();
        assert_eq!(err, FieldError::NonMonotonicAxis("theta"));
    }

    #[test]
    fn test_evaluate_many() {
        let interp = plane();
        let pts = array![[0.0, 0.0], [1.0, 2.0]];
        let out = interp.evaluate_many(pts.view()).unwrap();
        assert_eq!(out.len(), 2);
        assert!((out[1] - Complex::new(8.0, 1.0)).norm() < TOL);
    }
}
