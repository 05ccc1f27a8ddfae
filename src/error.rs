//! Error types for seeding

use thiserror::Error;

use crate::vector::distance::DistanceError;
use crate::vector::kmeans::KMeansError;

/// Errors raised while seeding
#[derive(Debug, Error)]
pub enum SeedError {
  // Configuration
  #[error("l * r should be greater or equal to k (l={l}, r={rounds}, k={k})")]
  InsufficientOversampling { l: usize, rounds: usize, k: usize },

  #[error("oversampling factor must be at least 1")]
  ZeroOversampling,

  #[error("number of clusters must be at least 1")]
  ZeroClusters,

  #[error("candidate pool of 1 + l * r entries does not fit in memory (l={l}, r={rounds})")]
  PoolTooLarge { l: usize, rounds: usize },

  #[error("cannot seed {k} clusters from {n} points")]
  TooManyClusters { k: usize, n: usize },

  #[error("invalid seeding config: {0}")]
  ConfigParse(#[from] serde_json::Error),

  // Input
  #[error("squared norms are required for seeding")]
  MissingNorms,

  #[error("squared norms length mismatch: expected {expected}, got {got}")]
  NormsLengthMismatch { expected: usize, got: usize },

  #[error("dataset has no rows")]
  EmptyDataset,

  #[error("dataset has no columns")]
  ZeroDimensions,

  #[error("invalid matrix: {0}")]
  InvalidMatrix(String),

  // Collaborators
  #[error(transparent)]
  Distance(#[from] DistanceError),

  #[error(transparent)]
  KMeans(#[from] KMeansError),
}

impl SeedError {
  /// Parameter errors, raised before any randomness is consumed
  pub fn is_configuration(&self) -> bool {
    matches!(
      self,
      SeedError::InsufficientOversampling { .. }
        | SeedError::ZeroOversampling
        | SeedError::ZeroClusters
        | SeedError::PoolTooLarge { .. }
        | SeedError::TooManyClusters { .. }
        | SeedError::ConfigParse(_)
    )
  }

  pub fn is_input(&self) -> bool {
    matches!(
      self,
      SeedError::MissingNorms
        | SeedError::NormsLengthMismatch { .. }
        | SeedError::EmptyDataset
        | SeedError::ZeroDimensions
        | SeedError::InvalidMatrix(_)
    )
  }
}

/// Result type for seeding operations
pub type Result<T> = std::result::Result<T, SeedError>;
