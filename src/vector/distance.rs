//! Distance functions
//!
//! Pairwise squared distances use precomputed squared norms:
//! `‖a - b‖² = ‖a‖² + ‖b‖² - 2·a·b`, clamped at zero.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use thiserror::Error;

use crate::dataset::{Dataset, DenseMatrix};

/// Dot product of two vectors
#[inline]
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
  debug_assert_eq!(a.len(), b.len());
  a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Squared Euclidean distance
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
  debug_assert_eq!(a.len(), b.len());
  a.iter()
    .zip(b.iter())
    .map(|(x, y)| {
      let d = x - y;
      d * d
    })
    .sum()
}

/// Squared L2 norm of a vector
#[inline]
pub fn squared_norm(v: &[f64]) -> f64 {
  dot_product(v, v)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
  #[error("Dimension mismatch: queries have {got} columns, data has {expected}")]
  ColumnMismatch { expected: usize, got: usize },
  #[error("Norms mismatch: expected {expected} squared norms, got {got}")]
  NormsMismatch { expected: usize, got: usize },
}

/// Squared distances from every query row to every data row.
///
/// Returns a `queries.n_rows() × data.n_rows()` matrix. `data_norms[j]` must be
/// the squared norm of data row `j`.
pub fn pairwise_squared_distances<D: Dataset + ?Sized>(
  queries: &DenseMatrix,
  data: &D,
  data_norms: &[f64],
) -> Result<DenseMatrix, DistanceError> {
  check_shapes(queries, data, data_norms)?;

  let mut out = DenseMatrix::zeros(queries.n_rows(), data.n_rows());
  for (q, query) in queries.rows().enumerate() {
    let query_norm = squared_norm(query);
    fill_indexed(out.row_mut(q), |j| {
      (query_norm + data_norms[j] - 2.0 * data.dot_row(j, query)).max(0.0)
    });
  }

  Ok(out)
}

/// Minimum squared distance from every data row to any query row
pub fn min_squared_distances<D: Dataset + ?Sized>(
  queries: &DenseMatrix,
  data: &D,
  data_norms: &[f64],
) -> Result<Vec<f64>, DistanceError> {
  let distances = pairwise_squared_distances(queries, data, data_norms)?;

  let mut min_dists = vec![f64::INFINITY; data.n_rows()];
  for row in distances.rows() {
    for (current, &d) in min_dists.iter_mut().zip(row) {
      if d < *current {
        *current = d;
      }
    }
  }

  Ok(min_dists)
}

/// Index of the nearest query row for every data row (first wins on ties)
pub fn nearest_queries<D: Dataset + ?Sized>(
  queries: &DenseMatrix,
  data: &D,
  data_norms: &[f64],
) -> Result<Vec<usize>, DistanceError> {
  let distances = pairwise_squared_distances(queries, data, data_norms)?;

  let mut best = vec![(0usize, f64::INFINITY); data.n_rows()];
  for (q, row) in distances.rows().enumerate() {
    for (slot, &d) in best.iter_mut().zip(row) {
      if d < slot.1 {
        *slot = (q, d);
      }
    }
  }

  Ok(best.into_iter().map(|(q, _)| q).collect())
}

fn check_shapes<D: Dataset + ?Sized>(
  queries: &DenseMatrix,
  data: &D,
  data_norms: &[f64],
) -> Result<(), DistanceError> {
  if queries.n_cols() != data.n_cols() {
    return Err(DistanceError::ColumnMismatch {
      expected: data.n_cols(),
      got: queries.n_cols(),
    });
  }
  if data_norms.len() != data.n_rows() {
    return Err(DistanceError::NormsMismatch {
      expected: data.n_rows(),
      got: data_norms.len(),
    });
  }
  Ok(())
}

/// `out[j] = f(j)`, split across threads on native targets
#[cfg(not(target_arch = "wasm32"))]
fn fill_indexed<F>(out: &mut [f64], f: F)
where
  F: Fn(usize) -> f64 + Sync + Send,
{
  out
    .par_iter_mut()
    .enumerate()
    .for_each(|(j, value)| *value = f(j));
}

#[cfg(target_arch = "wasm32")]
fn fill_indexed<F>(out: &mut [f64], f: F)
where
  F: Fn(usize) -> f64,
{
  for (j, value) in out.iter_mut().enumerate() {
    *value = f(j);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::CsrMatrix;

  #[test]
  fn test_dot_product() {
    let a = [1.0, 2.0, 3.0];
    let b = [4.0, 5.0, 6.0];
    assert_eq!(dot_product(&a, &b), 32.0);
  }

  #[test]
  fn test_squared_euclidean() {
    let a = [1.0, 0.0, 0.0];
    let b = [0.0, 1.0, 0.0];
    assert_eq!(squared_euclidean(&a, &b), 2.0);
    assert_eq!(squared_norm(&[3.0, 4.0]), 25.0);
  }

  #[test]
  fn test_pairwise_matches_direct() {
    let data = DenseMatrix::from_rows(&[[0.0, 0.0], [1.0, 2.0], [-3.0, 4.0], [0.5, -0.5]]).unwrap();
    let norms = data.squared_norms();
    let queries = DenseMatrix::from_rows(&[[1.0, 1.0], [-3.0, 4.0]]).unwrap();

    let distances = pairwise_squared_distances(&queries, &data, &norms).unwrap();
    assert_eq!(distances.n_rows(), 2);
    assert_eq!(distances.n_cols(), 4);
    for q in 0..2 {
      for j in 0..4 {
        let expected = squared_euclidean(queries.row(q), data.row(j));
        assert!((distances.row(q)[j] - expected).abs() < 1e-9);
      }
    }
    // query equal to a data row gives exactly zero
    assert_eq!(distances.row(1)[2], 0.0);
  }

  #[test]
  fn test_sparse_matches_dense() {
    let rows = [[1.0, 0.0, 2.0], [0.0, 0.0, 0.0], [0.0, 3.0, 0.0]];
    let dense = DenseMatrix::from_rows(&rows).unwrap();
    let sparse = CsrMatrix::from_dense_rows(&rows).unwrap();
    let queries = DenseMatrix::from_rows(&[[1.0, 1.0, 1.0]]).unwrap();

    let from_dense = pairwise_squared_distances(&queries, &dense, &dense.squared_norms()).unwrap();
    let from_sparse = pairwise_squared_distances(&queries, &sparse, &sparse.squared_norms()).unwrap();
    assert_eq!(from_dense, from_sparse);
  }

  #[test]
  fn test_min_and_nearest() {
    let data = DenseMatrix::from_rows(&[[0.0], [1.0], [5.0], [9.0]]).unwrap();
    let norms = data.squared_norms();
    let queries = DenseMatrix::from_rows(&[[0.0], [8.0]]).unwrap();

    let mins = min_squared_distances(&queries, &data, &norms).unwrap();
    assert_eq!(mins, vec![0.0, 1.0, 9.0, 1.0]);

    let nearest = nearest_queries(&queries, &data, &norms).unwrap();
    assert_eq!(nearest, vec![0, 0, 1, 1]);
  }

  #[test]
  fn test_shape_errors() {
    let data = DenseMatrix::from_rows(&[[0.0, 1.0]]).unwrap();
    let queries = DenseMatrix::from_rows(&[[0.0]]).unwrap();
    assert!(matches!(
      pairwise_squared_distances(&queries, &data, &[1.0]),
      Err(DistanceError::ColumnMismatch { expected: 2, got: 1 })
    ));

    let queries = DenseMatrix::from_rows(&[[0.0, 0.0]]).unwrap();
    assert!(matches!(
      pairwise_squared_distances(&queries, &data, &[]),
      Err(DistanceError::NormsMismatch { expected: 1, got: 0 })
    ));
  }
}
