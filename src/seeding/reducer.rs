//! Reduction of the oversampled pool to exactly k centers

use tracing::debug;

use crate::config::{CandidateWeighting, SeedConfig};
use crate::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::dataset::{Dataset, DenseMatrix};
use crate::error::Result;
use crate::rng::SeedRng;
use crate::seeding::sampler::Oversampled;
use crate::vector::distance::nearest_queries;
use crate::vector::kmeans::{weighted_kmeans, KMeansConfig};

/// Clusters a weighted point set down to `k` centers
pub trait Reducer {
  /// Return exactly `k` center rows for `points` weighted by `weights`
  fn reduce<R: SeedRng + ?Sized>(
    &self,
    points: &DenseMatrix,
    weights: &[f64],
    k: usize,
    rng: &mut R,
  ) -> Result<DenseMatrix>;
}

/// Weighted k-means++ seeding followed by Lloyd refinement
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansReducer {
  pub max_iterations: usize,
  pub tolerance: f64,
}

impl Default for KMeansReducer {
  fn default() -> Self {
    Self {
      max_iterations: DEFAULT_MAX_ITERATIONS,
      tolerance: DEFAULT_TOLERANCE,
    }
  }
}

impl KMeansReducer {
  pub fn from_config(config: &SeedConfig) -> Self {
    Self {
      max_iterations: config.max_iterations,
      tolerance: config.tolerance,
    }
  }
}

impl Reducer for KMeansReducer {
  fn reduce<R: SeedRng + ?Sized>(
    &self,
    points: &DenseMatrix,
    weights: &[f64],
    k: usize,
    rng: &mut R,
  ) -> Result<DenseMatrix> {
    let config = KMeansConfig::new(k)
      .with_max_iterations(self.max_iterations)
      .with_tolerance(self.tolerance);
    let result = weighted_kmeans(points, weights, &config, rng)?;

    debug!(
      k,
      pool = points.n_rows(),
      iterations = result.iterations,
      converged = result.converged,
      inertia = result.inertia,
      "k-means|| reduction finished"
    );

    Ok(result.centroids)
  }
}

/// Rows and weights of the candidate pool as handed to the reducer.
///
/// `Multiplicity` keeps every drawn id with weight 1. `Voronoi` keeps each
/// distinct id once, weighted by how many dataset points are closest to it.
/// When fewer than `k` distinct ids were drawn, `Voronoi` falls back to the
/// multiplicity pool, which always holds at least `k` rows.
pub fn reduction_pool<D: Dataset + ?Sized>(
  dataset: &D,
  squared_norms: &[f64],
  oversampled: &Oversampled,
  weighting: CandidateWeighting,
  k: usize,
) -> Result<(DenseMatrix, Vec<f64>)> {
  if weighting == CandidateWeighting::Voronoi {
    let distinct = distinct_in_order(&oversampled.candidate_ids, dataset.n_rows());
    if distinct.len() >= k {
      let points = dataset.gather(&distinct);
      let nearest = nearest_queries(&points, dataset, squared_norms)?;

      let mut weights = vec![0.0; distinct.len()];
      for candidate in nearest {
        weights[candidate] += 1.0;
      }
      return Ok((points, weights));
    }

    debug!(
      k,
      distinct = distinct.len(),
      pool = oversampled.pool_size(),
      "k-means|| too few distinct candidates for voronoi weighting, keeping duplicates"
    );
  }

  let points = dataset.gather(&oversampled.candidate_ids);
  let weights = vec![1.0; points.n_rows()];
  Ok((points, weights))
}

fn distinct_in_order(ids: &[usize], n: usize) -> Vec<usize> {
  let mut seen = vec![false; n];
  ids
    .iter()
    .copied()
    .filter(|&id| !std::mem::replace(&mut seen[id], true))
    .collect()
}
