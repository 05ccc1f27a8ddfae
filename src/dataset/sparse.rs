//! Compressed sparse row (CSR) matrix

use super::Dataset;
use crate::error::{Result, SeedError};

/// Sparse matrix in compressed row format.
///
/// Row `i` holds the entries `indptr[i]..indptr[i + 1]` of `indices` (column
/// ids, strictly increasing within a row) and `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
  n_cols: usize,
  indptr: Vec<usize>,
  indices: Vec<usize>,
  data: Vec<f64>,
}

impl CsrMatrix {
  pub fn new(n_cols: usize, indptr: Vec<usize>, indices: Vec<usize>, data: Vec<f64>) -> Result<Self> {
    let invalid = |msg: String| Err(SeedError::InvalidMatrix(msg));

    if indptr.first() != Some(&0) {
      return invalid("indptr must start with 0".to_string());
    }
    if indices.len() != data.len() {
      return invalid(format!(
        "indices ({}) and data ({}) lengths differ",
        indices.len(),
        data.len()
      ));
    }
    if indptr.last() != Some(&indices.len()) {
      return invalid(format!(
        "indptr must end with the number of stored values ({})",
        indices.len()
      ));
    }

    for (row, bounds) in indptr.windows(2).enumerate() {
      if bounds[0] > bounds[1] {
        return invalid(format!("indptr decreases at row {row}"));
      }
      let cols = &indices[bounds[0]..bounds[1]];
      if cols.windows(2).any(|pair| pair[0] >= pair[1]) {
        return invalid(format!("column indices of row {row} are not strictly increasing"));
      }
      if let Some(&col) = cols.last() {
        if col >= n_cols {
          return invalid(format!("column {col} out of range in row {row} (n_cols={n_cols})"));
        }
      }
    }

    Ok(Self {
      n_cols,
      indptr,
      indices,
      data,
    })
  }

  /// Build from dense rows, keeping only the non-zero entries
  pub fn from_dense_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
    let n_cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    let mut indptr = Vec::with_capacity(rows.len() + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();
    indptr.push(0);

    for (i, row) in rows.iter().enumerate() {
      let row = row.as_ref();
      if row.len() != n_cols {
        return Err(SeedError::InvalidMatrix(format!(
          "row {i} has {} columns, expected {n_cols}",
          row.len()
        )));
      }
      for (col, &value) in row.iter().enumerate() {
        if value != 0.0 {
          indices.push(col);
          data.push(value);
        }
      }
      indptr.push(indices.len());
    }

    Self::new(n_cols, indptr, indices, data)
  }

  /// Stored column ids and values of row `i`
  #[inline]
  pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
    let (start, end) = (self.indptr[i], self.indptr[i + 1]);
    (&self.indices[start..end], &self.data[start..end])
  }

  /// Number of stored values
  pub fn nnz(&self) -> usize {
    self.data.len()
  }
}

impl Dataset for CsrMatrix {
  fn n_rows(&self) -> usize {
    self.indptr.len() - 1
  }

  fn n_cols(&self) -> usize {
    self.n_cols
  }

  fn copy_row(&self, i: usize, out: &mut [f64]) {
    out.fill(0.0);
    let (cols, values) = self.row(i);
    for (&col, &value) in cols.iter().zip(values) {
      out[col] = value;
    }
  }

  #[inline]
  fn dot_row(&self, i: usize, query: &[f64]) -> f64 {
    debug_assert_eq!(query.len(), self.n_cols);
    let (cols, values) = self.row(i);
    cols.iter().zip(values).map(|(&col, &value)| value * query[col]).sum()
  }

  fn squared_norms(&self) -> Vec<f64> {
    (0..self.n_rows())
      .map(|i| self.row(i).1.iter().map(|v| v * v).sum())
      .collect()
  }
}
