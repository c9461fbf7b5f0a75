//! Parallel Processing Module
//!
//! Rayon-backed variants of the batch operations. Enable with the
//! `parallel` feature flag.
//!
//! ```toml
//! [dependencies]
//! antpat-core = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! Splitting pays off for dense query sets (e.g. a 1° full-sphere map) and
//! for re-expressing many fields at once. Each chunk rebuilds the periodic
//! extension of the field, so small query sets are faster sequentially.

use ndarray::{concatenate, Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::field::TangentialField;
use crate::jones::{gain_and_ixr, JonesMatrix};
use crate::linalg::Mat3;
use crate::types::{Complex, FieldError, FieldResult};

/// Chunked parallel evaluator for field queries.
#[derive(Debug, Clone, Copy)]
pub struct ParallelEvaluator {
    chunk_size: usize,
}

impl Default for ParallelEvaluator {
    fn default() -> Self {
        Self { chunk_size: 4096 }
    }
}

impl ParallelEvaluator {
    /// Create an evaluator handing `chunk_size` query points to each task.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Parallel [`TangentialField::value_at`]; same result shape and errors.
    pub fn value_at(
        &self,
        field: &TangentialField,
        thetas: &[f64],
        phis: &[f64],
        radii: Option<&[f64]>,
    ) -> FieldResult<(Array2<Complex>, Array2<Complex>)> {
        if thetas.len() != phis.len() {
            return Err(FieldError::shape("phis", &[thetas.len()], &[phis.len()]));
        }
        if thetas.len() <= self.chunk_size {
            return field.value_at(thetas, phis, radii);
        }
        let parts = thetas
            .par_chunks(self.chunk_size)
            .zip(phis.par_chunks(self.chunk_size))
            .map(|(t, p)| field.value_at(t, p, radii))
            .collect::<FieldResult<Vec<_>>>()?;

        let join = |pick: fn(&(Array2<Complex>, Array2<Complex>)) -> &Array2<Complex>| {
            let views: Vec<ArrayView2<Complex>> = parts.iter().map(|part| pick(part).view()).collect();
            concatenate(Axis(1), &views).map_err(|_| {
                let rows = views.first().map_or(0, |v| v.nrows());
                FieldError::shape("parallel chunks", &[rows, thetas.len()], &[views.len()])
            })
        };
        Ok((join(|p| &p.0)?, join(|p| &p.1)?))
    }

    /// Re-express several fields in the same rotated frame.
    pub fn reexpress_batch(&self, fields: &[TangentialField], rotation: &Mat3) -> FieldResult<Vec<TangentialField>> {
        fields.par_iter().map(|f| f.reexpressed(rotation)).collect()
    }
}

/// Parallel [`gain_and_ixr`] over many Jones matrices.
pub fn gain_and_ixr_batch(jones: &[JonesMatrix]) -> (Vec<f64>, Vec<f64>) {
    jones.par_iter().map(gain_and_ixr).unzip()
}
