//! Seeding configuration

use serde::{Deserialize, Serialize};

use crate::constants::{
  DEFAULT_CLUSTERS, DEFAULT_MAX_ITERATIONS, DEFAULT_OVERSAMPLING, DEFAULT_ROUNDS, DEFAULT_TOLERANCE,
};
use crate::error::{Result, SeedError};

/// How the oversampled candidate pool is weighted for the final reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateWeighting {
  /// Every drawn candidate counts once; a point drawn twice counts twice
  #[default]
  Multiplicity,
  /// Distinct candidates weighted by the number of points closest to them
  Voronoi,
}

/// Configuration for scalable (k-means||) seeding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
  /// Number of centers to return (k)
  pub n_clusters: usize,
  /// Candidates drawn per round (l)
  pub oversampling: usize,
  /// Minimum number of rounds (r); raised to `k / l` when smaller
  pub rounds: usize,
  /// Lloyd iterations allowed in the reduction
  pub max_iterations: usize,
  /// Convergence tolerance of the reduction (relative inertia change)
  pub tolerance: f64,
  /// Weighting of the candidate pool handed to the reducer
  pub weighting: CandidateWeighting,
}

impl Default for SeedConfig {
  fn default() -> Self {
    Self {
      n_clusters: DEFAULT_CLUSTERS,
      oversampling: DEFAULT_OVERSAMPLING,
      rounds: DEFAULT_ROUNDS,
      max_iterations: DEFAULT_MAX_ITERATIONS,
      tolerance: DEFAULT_TOLERANCE,
      weighting: CandidateWeighting::default(),
    }
  }
}

impl SeedConfig {
  pub fn new(n_clusters: usize) -> Self {
    Self {
      n_clusters,
      ..Default::default()
    }
  }

  /// Parse a config from JSON; missing fields take their defaults
  pub fn from_json(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn with_oversampling(mut self, oversampling: usize) -> Self {
    self.oversampling = oversampling;
    self
  }

  pub fn with_rounds(mut self, rounds: usize) -> Self {
    self.rounds = rounds;
    self
  }

  pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
    self.max_iterations = max_iterations;
    self
  }

  pub fn with_tolerance(mut self, tolerance: f64) -> Self {
    self.tolerance = tolerance;
    self
  }

  pub fn with_weighting(mut self, weighting: CandidateWeighting) -> Self {
    self.weighting = weighting;
    self
  }

  /// Rounds actually run: `max(k / l, r)` with floor division
  pub fn effective_rounds(&self) -> usize {
    if self.oversampling == 0 {
      return self.rounds;
    }
    (self.n_clusters / self.oversampling).max(self.rounds)
  }

  /// Check the parameters and return the effective round count.
  ///
  /// Fails when `l * r_eff < k`: the pool could not hold enough candidates
  /// for the reduction.
  pub fn validate(&self) -> Result<usize> {
    if self.n_clusters == 0 {
      return Err(SeedError::ZeroClusters);
    }
    if self.oversampling == 0 {
      return Err(SeedError::ZeroOversampling);
    }

    let rounds = self.effective_rounds();
    if self.oversampling.saturating_mul(rounds) < self.n_clusters {
      return Err(SeedError::InsufficientOversampling {
        l: self.oversampling,
        rounds,
        k: self.n_clusters,
      });
    }

    self.pool_size()?;
    Ok(rounds)
  }

  /// Number of candidates in the pool after all rounds (`1 + l * r_eff`)
  pub fn pool_size(&self) -> Result<usize> {
    let rounds = self.effective_rounds();
    self
      .oversampling
      .checked_mul(rounds)
      .and_then(|drawn| drawn.checked_add(1))
      .ok_or(SeedError::PoolTooLarge {
        l: self.oversampling,
        rounds,
      })
  }
}
