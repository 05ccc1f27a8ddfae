//! Scalable k-means|| seeding
//!
//! Seeding runs in two phases:
//!
//! 1. **Oversampling** ([`SeedSampler`]): starting from one uniformly drawn
//!    point, `r_eff = max(k / l, r)` rounds each draw `l` candidates by
//!    D²-sampling against the candidates chosen so far.
//! 2. **Reduction** ([`Reducer`]): the `1 + l * r_eff` candidates are
//!    clustered down to exactly `k` centers with weighted k-means++ and Lloyd
//!    refinement.
//!
//! Each round needs a single pass over the data, against one pass per center
//! for plain k-means++.
//!
//! A full [`seed`] call takes one index and `1 + l * r_eff` reals from the
//! caller's source: the last real seeds a private generator for the reducer.
//!
//! # Example
//!
//! ```
//! use kmeans_par::{seed, Dataset, DenseMatrix, SeedConfig};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let data = DenseMatrix::from_rows(&[[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]]).unwrap();
//! let norms = data.squared_norms();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let centers = seed(&data, Some(&norms[..]), &mut rng, &SeedConfig::new(2)).unwrap();
//! assert_eq!(centers.n_rows(), 2);
//! ```

mod reducer;
mod sampler;

pub use reducer::{reduction_pool, KMeansReducer, Reducer};
pub use sampler::{Oversampled, SeedSampler};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::SeedConfig;
use crate::dataset::{Dataset, DenseMatrix};
use crate::error::{Result, SeedError};
use crate::rng::SeedRng;

/// Pick `config.n_clusters` initial centers with k-means|| and the built-in
/// k-means reducer.
///
/// `squared_norms` must hold the squared Euclidean norm of every row of
/// `dataset`; they are never recomputed here.
pub fn seed<D, R>(
  dataset: &D,
  squared_norms: Option<&[f64]>,
  rng: &mut R,
  config: &SeedConfig,
) -> Result<DenseMatrix>
where
  D: Dataset + ?Sized,
  R: SeedRng + ?Sized,
{
  seed_with(dataset, squared_norms, rng, config, &KMeansReducer::from_config(config))
}

/// Same as [`seed`] with a caller-supplied reducer
pub fn seed_with<D, R, Rd>(
  dataset: &D,
  squared_norms: Option<&[f64]>,
  rng: &mut R,
  config: &SeedConfig,
  reducer: &Rd,
) -> Result<DenseMatrix>
where
  D: Dataset + ?Sized,
  R: SeedRng + ?Sized,
  Rd: Reducer,
{
  let oversampled = oversample(dataset, squared_norms, rng, config)?;
  let squared_norms = squared_norms.ok_or(SeedError::MissingNorms)?;

  let (points, weights) = reduction_pool(
    dataset,
    squared_norms,
    &oversampled,
    config.weighting,
    config.n_clusters,
  )?;

  // One more real from the caller's source seeds the reducer's own stream
  let mut reducer_rng = StdRng::seed_from_u64(rng.uniform_real().to_bits());
  let centers = reducer.reduce(&points, &weights, config.n_clusters, &mut reducer_rng)?;

  info!(
    k = config.n_clusters,
    l = config.oversampling,
    rounds = oversampled.rounds,
    pool = oversampled.pool_size(),
    reduced_from = points.n_rows(),
    potential = oversampled.potential,
    "k-means|| seeding complete"
  );

  Ok(centers)
}

/// Run only the oversampling phase and return the candidate pool
pub fn oversample<D, R>(
  dataset: &D,
  squared_norms: Option<&[f64]>,
  rng: &mut R,
  config: &SeedConfig,
) -> Result<Oversampled>
where
  D: Dataset + ?Sized,
  R: SeedRng + ?Sized,
{
  SeedSampler::start(dataset, squared_norms, config, rng)?.run(rng)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::CandidateWeighting;
  use crate::vector::distance::squared_euclidean;

  fn three_blobs() -> DenseMatrix {
    let mut rows = Vec::new();
    for (cx, cy) in [(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)] {
      for i in 0..30 {
        let dx = (i % 5) as f64 * 0.1;
        let dy = (i / 5) as f64 * 0.1;
        rows.push([cx + dx, cy + dy]);
      }
    }
    DenseMatrix::from_rows(&rows).unwrap()
  }

  /// Reducer that keeps the first k pool rows
  struct FirstK;

  impl Reducer for FirstK {
    fn reduce<R: SeedRng + ?Sized>(
      &self,
      points: &DenseMatrix,
      _weights: &[f64],
      k: usize,
      _rng: &mut R,
    ) -> Result<DenseMatrix> {
      let rows: Vec<Vec<f64>> = points.rows().take(k).map(|r| r.to_vec()).collect();
      DenseMatrix::from_rows(&rows)
    }
  }

  #[test]
  fn test_seed_finds_separated_blobs() {
    let data = three_blobs();
    let norms = data.squared_norms();
    let mut rng = StdRng::seed_from_u64(7);

    let centers = seed(&data, Some(&norms[..]), &mut rng, &SeedConfig::new(3)).unwrap();
    assert_eq!(centers.n_rows(), 3);

    // every blob gets a center close to its middle
    for blob in [[0.2, 0.25], [20.2, 0.25], [0.2, 20.25]] {
      let closest = centers
        .rows()
        .map(|c| squared_euclidean(c, &blob))
        .fold(f64::INFINITY, f64::min);
      assert!(closest < 1.0, "no center near {blob:?}");
    }
  }

  #[test]
  fn test_seed_with_custom_reducer() {
    let data = three_blobs();
    let norms = data.squared_norms();
    let mut rng = StdRng::seed_from_u64(3);

    let centers = seed_with(&data, Some(&norms[..]), &mut rng, &SeedConfig::new(2), &FirstK).unwrap();
    assert_eq!(centers.n_rows(), 2);
    // rows come straight from the dataset
    for center in centers.rows() {
      assert!(data.rows().any(|row| row == center));
    }
  }

  #[test]
  fn test_seed_voronoi_weighting() {
    let data = three_blobs();
    let norms = data.squared_norms();
    let mut rng = StdRng::seed_from_u64(5);
    let config = SeedConfig::new(3).with_weighting(CandidateWeighting::Voronoi);

    let centers = seed(&data, Some(&norms[..]), &mut rng, &config).unwrap();
    assert_eq!(centers.n_rows(), 3);
  }

  #[test]
  fn test_seed_missing_norms() {
    let data = three_blobs();
    let mut rng = StdRng::seed_from_u64(5);

    let err = seed(&data, None, &mut rng, &SeedConfig::new(3)).unwrap_err();
    assert!(matches!(err, SeedError::MissingNorms));
    assert!(err.is_input());
  }
}
