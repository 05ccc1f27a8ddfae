//! Dataset representations
//!
//! The sampler only talks to the [`Dataset`] trait, so dense and sparse
//! inputs share one code path.

mod dense;
mod sparse;

pub use dense::DenseMatrix;
pub use sparse::CsrMatrix;

use crate::vector::distance::dot_product;

/// Row access and inner products over an immutable `n × d` point set
pub trait Dataset: Sync {
  /// Number of points (n)
  fn n_rows(&self) -> usize;

  /// Number of dimensions (d)
  fn n_cols(&self) -> usize;

  /// Write row `i` densely into `out` (`out.len() == n_cols`)
  fn copy_row(&self, i: usize, out: &mut [f64]);

  /// Inner product of row `i` with a dense query of length `n_cols`
  fn dot_row(&self, i: usize, query: &[f64]) -> f64;

  /// Squared Euclidean norm of every row.
  ///
  /// Seeding takes the norms as an argument; this is for callers to
  /// precompute them once.
  fn squared_norms(&self) -> Vec<f64> {
    let mut row = vec![0.0; self.n_cols()];
    (0..self.n_rows())
      .map(|i| {
        self.copy_row(i, &mut row);
        dot_product(&row, &row)
      })
      .collect()
  }

  /// Dense copy of the rows at `ids`, in order, duplicates kept
  fn gather(&self, ids: &[usize]) -> DenseMatrix {
    let mut out = DenseMatrix::zeros(ids.len(), self.n_cols());
    for (dst, &id) in ids.iter().enumerate() {
      self.copy_row(id, out.row_mut(dst));
    }
    out
  }
}
