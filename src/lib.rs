//! kmeans-par - Scalable k-means|| seeding
//!
//! Picks initial centers for k-means the way k-means++ does, but draws many
//! candidates per pass over the data instead of one.
//!
//! # Architecture
//!
//! - **Seed sampler**: oversampling rounds of D²-sampling that grow a
//!   candidate pool of `1 + l * r_eff` points
//! - **Reducer**: weighted k-means++ plus Lloyd refinement collapsing the pool
//!   to exactly `k` centers
//! - **Dataset**: dense and CSR inputs behind one trait
//!
//! Randomness and squared norms are always passed in explicitly, so a seeded
//! generator reproduces a run exactly.

#![deny(clippy::all)]

pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod rng;
pub mod seeding;
pub mod vector;

// Re-export commonly used items
pub use config::{CandidateWeighting, SeedConfig};
pub use dataset::{CsrMatrix, Dataset, DenseMatrix};
pub use error::{Result, SeedError};
pub use rng::SeedRng;
pub use seeding::{
  oversample, reduction_pool, seed, seed_with, KMeansReducer, Oversampled, Reducer, SeedSampler,
};
