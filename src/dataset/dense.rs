//! Row-major dense matrix

use super::Dataset;
use crate::error::{Result, SeedError};
use crate::vector::distance::dot_product;

/// Dense `n_rows × n_cols` matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
  data: Vec<f64>,
  n_rows: usize,
  n_cols: usize,
}

impl DenseMatrix {
  /// Wrap contiguous row-major data (`data.len() == n_rows * n_cols`)
  pub fn from_vec(data: Vec<f64>, n_rows: usize, n_cols: usize) -> Result<Self> {
    if data.len() != n_rows * n_cols {
      return Err(SeedError::InvalidMatrix(format!(
        "expected {} values for {}x{}, got {}",
        n_rows * n_cols,
        n_rows,
        n_cols,
        data.len()
      )));
    }
    Ok(Self {
      data,
      n_rows,
      n_cols,
    })
  }

  /// Build from a list of equally sized rows
  pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
    let n_cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    let mut data = Vec::with_capacity(rows.len() * n_cols);
    for (i, row) in rows.iter().enumerate() {
      let row = row.as_ref();
      if row.len() != n_cols {
        return Err(SeedError::InvalidMatrix(format!(
          "row {i} has {} columns, expected {n_cols}",
          row.len()
        )));
      }
      data.extend_from_slice(row);
    }
    Self::from_vec(data, rows.len(), n_cols)
  }

  pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
    Self {
      data: vec![0.0; n_rows * n_cols],
      n_rows,
      n_cols,
    }
  }

  #[inline]
  pub fn n_rows(&self) -> usize {
    self.n_rows
  }

  #[inline]
  pub fn n_cols(&self) -> usize {
    self.n_cols
  }

  #[inline]
  pub fn row(&self, i: usize) -> &[f64] {
    let offset = i * self.n_cols;
    &self.data[offset..offset + self.n_cols]
  }

  #[inline]
  pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
    let offset = i * self.n_cols;
    &mut self.data[offset..offset + self.n_cols]
  }

  pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
    (0..self.n_rows).map(move |i| self.row(i))
  }

  pub fn as_slice(&self) -> &[f64] {
    &self.data
  }
}

impl Dataset for DenseMatrix {
  fn n_rows(&self) -> usize {
    self.n_rows
  }

  fn n_cols(&self) -> usize {
    self.n_cols
  }

  fn copy_row(&self, i: usize, out: &mut [f64]) {
    out.copy_from_slice(self.row(i));
  }

  #[inline]
  fn dot_row(&self, i: usize, query: &[f64]) -> f64 {
    dot_product(self.row(i), query)
  }

  fn squared_norms(&self) -> Vec<f64> {
    self.rows().map(|row| dot_product(row, row)).collect()
  }
}
