//! Numeric primitives: distances and weighted k-means

pub mod distance;
pub mod kmeans;

pub use distance::{
  min_squared_distances, nearest_queries, pairwise_squared_distances, DistanceError,
};
pub use kmeans::{kmeans, weighted_kmeans, KMeansConfig, KMeansError, KMeansResult};
