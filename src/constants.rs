//! Default parameters for scalable seeding

// ============================================================================
// Oversampling
// ============================================================================

/// Candidates drawn per round (`l`)
pub const DEFAULT_OVERSAMPLING: usize = 4;
/// Minimum number of oversampling rounds (`r`)
pub const DEFAULT_ROUNDS: usize = 5;
/// Number of clusters used by `SeedConfig::default()`
pub const DEFAULT_CLUSTERS: usize = 8;

// ============================================================================
// Reduction (weighted k-means)
// ============================================================================

pub const DEFAULT_MAX_ITERATIONS: usize = 300;
/// Relative inertia change under which Lloyd iterations stop
pub const DEFAULT_TOLERANCE: f64 = 1e-4;
