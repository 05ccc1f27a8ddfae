//! Weighted k-means clustering
//!
//! Implements weighted k-means++ initialization and Lloyd's algorithm. This is
//! the reducer that collapses an oversampled candidate pool to k centers.

use thiserror::Error;

use crate::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::dataset::DenseMatrix;
use crate::rng::SeedRng;
use crate::vector::distance::squared_euclidean;

// ============================================================================
// K-Means Configuration
// ============================================================================

/// Configuration for k-means clustering
#[derive(Debug, Clone)]
pub struct KMeansConfig {
  /// Number of clusters (k)
  pub n_clusters: usize,
  /// Maximum iterations
  pub max_iterations: usize,
  /// Convergence tolerance (relative inertia change)
  pub tolerance: f64,
}

impl Default for KMeansConfig {
  fn default() -> Self {
    Self {
      n_clusters: 8,
      max_iterations: DEFAULT_MAX_ITERATIONS,
      tolerance: DEFAULT_TOLERANCE,
    }
  }
}

impl KMeansConfig {
  pub fn new(n_clusters: usize) -> Self {
    Self {
      n_clusters,
      ..Default::default()
    }
  }

  pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
    self.max_iterations = max_iterations;
    self
  }

  pub fn with_tolerance(mut self, tolerance: f64) -> Self {
    self.tolerance = tolerance;
    self
  }
}

// ============================================================================
// K-Means Result
// ============================================================================

/// Result of k-means clustering
#[derive(Debug, Clone)]
pub struct KMeansResult {
  /// Centroids (k rows)
  pub centroids: DenseMatrix,
  /// Cluster assignment for each point
  pub assignments: Vec<usize>,
  /// Final inertia (weighted sum of squared distances to centroids)
  pub inertia: f64,
  /// Number of iterations performed
  pub iterations: usize,
  /// Whether converged (inertia change < tolerance)
  pub converged: bool,
}

// ============================================================================
// K-Means Algorithm
// ============================================================================

/// Run k-means with every point weighted equally
pub fn kmeans<R: SeedRng + ?Sized>(
  points: &DenseMatrix,
  config: &KMeansConfig,
  rng: &mut R,
) -> Result<KMeansResult, KMeansError> {
  let weights = vec![1.0; points.n_rows()];
  weighted_kmeans(points, &weights, config, rng)
}

/// Run weighted k-means clustering
///
/// # Arguments
/// * `points` - Points to cluster (one per row)
/// * `weights` - Non-negative weight per point, not all zero
/// * `config` - K-means configuration
/// * `rng` - Random source for the k-means++ initialization
///
/// # Returns
/// K-means result with centroids and assignments
pub fn weighted_kmeans<R: SeedRng + ?Sized>(
  points: &DenseMatrix,
  weights: &[f64],
  config: &KMeansConfig,
  rng: &mut R,
) -> Result<KMeansResult, KMeansError> {
  let n = points.n_rows();
  let k = config.n_clusters;

  if k == 0 {
    return Err(KMeansError::ZeroClusters);
  }
  if n < k {
    return Err(KMeansError::NotEnoughVectors { n, k });
  }
  if weights.len() != n {
    return Err(KMeansError::WeightsMismatch {
      expected: n,
      got: weights.len(),
    });
  }
  if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || !weights.iter().any(|w| *w > 0.0) {
    return Err(KMeansError::InvalidWeights);
  }

  // Initialize centroids using weighted k-means++
  let mut centroids = kmeans_plus_plus_init(points, weights, k, rng);

  // Run Lloyd's algorithm
  let mut assignments = vec![0usize; n];
  let mut prev_inertia = f64::INFINITY;
  let mut iterations = 0;
  let mut converged = false;

  for iter in 0..config.max_iterations {
    iterations = iter + 1;

    let inertia = assign_to_centroids(points, weights, &centroids, &mut assignments);

    // Check for convergence
    let inertia_change = (prev_inertia - inertia).abs() / inertia.max(1.0);
    if inertia_change < config.tolerance {
      converged = true;
      break;
    }
    prev_inertia = inertia;

    update_centroids(points, weights, &assignments, &mut centroids);
  }

  // Final assignment pass
  let inertia = assign_to_centroids(points, weights, &centroids, &mut assignments);

  Ok(KMeansResult {
    centroids,
    assignments,
    inertia,
    iterations,
    converged,
  })
}

/// Weighted k-means++ initialization.
///
/// The first centroid is drawn proportionally to weight, each following one
/// proportionally to `weight * D²`.
fn kmeans_plus_plus_init<R: SeedRng + ?Sized>(
  points: &DenseMatrix,
  weights: &[f64],
  k: usize,
  rng: &mut R,
) -> DenseMatrix {
  let n = points.n_rows();
  let mut centroids = DenseMatrix::zeros(k, points.n_cols());

  let first_idx = sample_proportional(weights, rng);
  centroids.row_mut(0).copy_from_slice(points.row(first_idx));

  let mut min_dists = vec![f64::INFINITY; n];
  let mut mass = vec![0.0; n];

  for c in 1..k {
    // Update min distances against the centroid added last
    let prev_centroid = centroids.row(c - 1);
    for (i, point) in points.rows().enumerate() {
      let dist = squared_euclidean(point, prev_centroid);
      min_dists[i] = min_dists[i].min(dist);
      mass[i] = weights[i] * min_dists[i];
    }

    let selected_idx = sample_proportional(&mass, rng);
    centroids.row_mut(c).copy_from_slice(points.row(selected_idx));
  }

  centroids
}

/// Draw an index with probability proportional to `mass`.
///
/// Falls back to a uniform draw when the total mass is zero (every point sits
/// on a centroid already).
fn sample_proportional<R: SeedRng + ?Sized>(mass: &[f64], rng: &mut R) -> usize {
  let n = mass.len();
  let total: f64 = mass.iter().sum();
  let u = rng.uniform_real();

  if !(total > 0.0 && total.is_finite()) {
    return ((u * n as f64) as usize).min(n - 1);
  }

  let mut remaining = u * total;
  let mut selected = n - 1;
  for (i, &m) in mass.iter().enumerate() {
    if m <= 0.0 {
      continue;
    }
    selected = i;
    remaining -= m;
    if remaining < 0.0 {
      break;
    }
  }

  selected
}

/// Assign points to nearest centroids.
/// Returns the weighted inertia.
fn assign_to_centroids(
  points: &DenseMatrix,
  weights: &[f64],
  centroids: &DenseMatrix,
  assignments: &mut [usize],
) -> f64 {
  let mut inertia = 0.0;

  for (i, point) in points.rows().enumerate() {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;

    for (c, centroid) in centroids.rows().enumerate() {
      let dist = squared_euclidean(point, centroid);
      if dist < best_dist {
        best_dist = dist;
        best_cluster = c;
      }
    }

    assignments[i] = best_cluster;
    inertia += weights[i] * best_dist;
  }

  inertia
}

/// Move every centroid to the weighted mean of its points
fn update_centroids(
  points: &DenseMatrix,
  weights: &[f64],
  assignments: &[usize],
  centroids: &mut DenseMatrix,
) {
  let k = centroids.n_rows();
  let mut cluster_sums = DenseMatrix::zeros(k, points.n_cols());
  let mut cluster_weights = vec![0.0f64; k];

  for (i, point) in points.rows().enumerate() {
    let cluster = assignments[i];
    let w = weights[i];
    for (sum, &x) in cluster_sums.row_mut(cluster).iter_mut().zip(point) {
      *sum += w * x;
    }
    cluster_weights[cluster] += w;
  }

  for (c, &total) in cluster_weights.iter().enumerate() {
    if total <= 0.0 {
      // Keep existing centroid
      continue;
    }

    for (dst, &sum) in centroids.row_mut(c).iter_mut().zip(cluster_sums.row(c)) {
      *dst = sum / total;
    }
  }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KMeansError {
  #[error("Not enough vectors: {n} < {k} clusters")]
  NotEnoughVectors { n: usize, k: usize },
  #[error("Weights mismatch: expected {expected}, got {got}")]
  WeightsMismatch { expected: usize, got: usize },
  #[error("Weights must be finite, non-negative and not all zero")]
  InvalidWeights,
  #[error("Number of clusters must be at least 1")]
  ZeroClusters,
}

// ============================================================================
// Tests
// ============================================================================
