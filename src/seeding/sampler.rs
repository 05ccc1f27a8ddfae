//! Oversampling rounds of k-means||
//!
//! Each round draws `l` candidates with probability proportional to their
//! current squared distance from the candidate set (D²-sampling), then folds
//! the distances to those candidates into the per-point minimum.

use tracing::{debug, warn};

use crate::config::SeedConfig;
use crate::dataset::Dataset;
use crate::error::{Result, SeedError};
use crate::rng::SeedRng;
use crate::vector::distance::min_squared_distances;

/// Candidate pool produced by the oversampling phase
#[derive(Debug, Clone, PartialEq)]
pub struct Oversampled {
  /// Founding index followed by every round's draws, duplicates kept
  pub candidate_ids: Vec<usize>,
  /// Squared distance from every point to its nearest candidate
  pub min_sq_dist: Vec<f64>,
  /// Sum of `min_sq_dist`
  pub potential: f64,
  /// Potential after the founding draw and after every round
  pub potential_trace: Vec<f64>,
  /// Rounds run (`r_eff`)
  pub rounds: usize,
}

impl Oversampled {
  pub fn pool_size(&self) -> usize {
    self.candidate_ids.len()
  }
}

/// State of one k-means|| oversampling run.
///
/// Created by [`SeedSampler::start`], which validates everything and draws the
/// founding center. Rounds then run one at a time through
/// [`SeedSampler::run_round`] or all at once through [`SeedSampler::run`].
#[derive(Debug)]
pub struct SeedSampler<'a, D: Dataset + ?Sized> {
  dataset: &'a D,
  squared_norms: &'a [f64],
  oversampling: usize,
  rounds: usize,
  rounds_completed: usize,
  candidate_ids: Vec<usize>,
  min_sq_dist: Vec<f64>,
  potential: f64,
  potential_trace: Vec<f64>,
  fallback_reported: bool,
}

impl<'a, D: Dataset + ?Sized> SeedSampler<'a, D> {
  /// Validate the inputs, draw the founding center and compute the initial
  /// distance state.
  ///
  /// Every configuration and input error is returned before `rng` is touched.
  pub fn start<R: SeedRng + ?Sized>(
    dataset: &'a D,
    squared_norms: Option<&'a [f64]>,
    config: &SeedConfig,
    rng: &mut R,
  ) -> Result<Self> {
    let rounds = config.validate()?;
    let pool_size = config.pool_size()?;
    let squared_norms = check_inputs(dataset, squared_norms, config.n_clusters)?;

    let mut candidate_ids = Vec::new();
    candidate_ids
      .try_reserve_exact(pool_size)
      .map_err(|_| SeedError::PoolTooLarge {
        l: config.oversampling,
        rounds,
      })?;

    let n = dataset.n_rows();
    let founder = rng.uniform_index(n);
    let founder_row = dataset.gather(&[founder]);
    let min_sq_dist = min_squared_distances(&founder_row, dataset, squared_norms)?;
    let potential: f64 = min_sq_dist.iter().sum();

    debug!(
      n_points = n,
      founder,
      potential,
      rounds,
      oversampling = config.oversampling,
      "k-means|| founding center drawn"
    );

    candidate_ids.push(founder);

    Ok(Self {
      dataset,
      squared_norms,
      oversampling: config.oversampling,
      rounds,
      rounds_completed: 0,
      candidate_ids,
      min_sq_dist,
      potential,
      potential_trace: vec![potential],
      fallback_reported: false,
    })
  }

  /// Rounds this run will perform (`r_eff`)
  pub fn rounds(&self) -> usize {
    self.rounds
  }

  pub fn rounds_completed(&self) -> usize {
    self.rounds_completed
  }

  pub fn is_finished(&self) -> bool {
    self.rounds_completed >= self.rounds
  }

  pub fn candidate_ids(&self) -> &[usize] {
    &self.candidate_ids
  }

  pub fn min_sq_dist(&self) -> &[f64] {
    &self.min_sq_dist
  }

  pub fn potential(&self) -> f64 {
    self.potential
  }

  /// Run one oversampling round.
  ///
  /// Returns the candidates drawn this round, or `None` once all rounds have
  /// been run.
  pub fn run_round<R: SeedRng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<&[usize]>> {
    if self.is_finished() {
      return Ok(None);
    }

    let mut draws = vec![0.0; self.oversampling];
    rng.uniform_reals(&mut draws);
    let drawn = draw_candidates(&self.min_sq_dist, self.potential, &draws);

    if drawn.uniform_fallback && !self.fallback_reported {
      warn!(
        round = self.rounds_completed,
        potential = self.potential,
        "k-means|| potential is zero, drawing candidates uniformly"
      );
      self.fallback_reported = true;
    }
    if drawn.clamped > 0 {
      debug!(
        round = self.rounds_completed,
        clamped = drawn.clamped,
        "k-means|| clamped candidate index past the last cumulative bucket"
      );
    }

    let candidates = self.dataset.gather(&drawn.ids);
    let round_min = min_squared_distances(&candidates, self.dataset, self.squared_norms)?;
    for (current, new) in self.min_sq_dist.iter_mut().zip(round_min) {
      if new < *current {
        *current = new;
      }
    }
    self.potential = self.min_sq_dist.iter().sum();
    self.potential_trace.push(self.potential);

    let start = self.candidate_ids.len();
    self.candidate_ids.extend_from_slice(&drawn.ids);
    self.rounds_completed += 1;

    debug!(
      round = self.rounds_completed,
      potential = self.potential,
      drawn = drawn.ids.len(),
      pool = self.candidate_ids.len(),
      "k-means|| round complete"
    );

    Ok(Some(&self.candidate_ids[start..]))
  }

  /// Run the remaining rounds and return the candidate pool
  pub fn run<R: SeedRng + ?Sized>(mut self, rng: &mut R) -> Result<Oversampled> {
    while self.run_round(rng)?.is_some() {}
    Ok(self.finish())
  }

  pub fn finish(self) -> Oversampled {
    Oversampled {
      candidate_ids: self.candidate_ids,
      min_sq_dist: self.min_sq_dist,
      potential: self.potential,
      potential_trace: self.potential_trace,
      rounds: self.rounds_completed,
    }
  }
}

/// Check dataset shape and norms, returning the norms
fn check_inputs<'a, D: Dataset + ?Sized>(
  dataset: &D,
  squared_norms: Option<&'a [f64]>,
  k: usize,
) -> Result<&'a [f64]> {
  let n = dataset.n_rows();
  if n == 0 {
    return Err(SeedError::EmptyDataset);
  }
  if dataset.n_cols() == 0 {
    return Err(SeedError::ZeroDimensions);
  }
  if k > n {
    return Err(SeedError::TooManyClusters { k, n });
  }

  let squared_norms = squared_norms.ok_or(SeedError::MissingNorms)?;
  if squared_norms.len() != n {
    return Err(SeedError::NormsLengthMismatch {
      expected: n,
      got: squared_norms.len(),
    });
  }

  Ok(squared_norms)
}

/// Candidates picked from one batch of uniform draws
#[derive(Debug, PartialEq)]
struct Drawn {
  ids: Vec<usize>,
  /// Draws that landed past the last cumulative bucket
  clamped: usize,
  /// Potential was zero, so indices were drawn uniformly
  uniform_fallback: bool,
}

/// Map uniform draws in `[0, 1)` to point indices by D²-sampling.
///
/// Each draw is scaled by `potential`; the chosen index is the first whose
/// inclusive cumulative distance exceeds it.
fn draw_candidates(min_sq_dist: &[f64], potential: f64, draws: &[f64]) -> Drawn {
  let n = min_sq_dist.len();
  let last = n - 1;

  if !(potential > 0.0 && potential.is_finite()) {
    return Drawn {
      ids: draws
        .iter()
        .map(|u| ((u * n as f64) as usize).min(last))
        .collect(),
      clamped: 0,
      uniform_fallback: true,
    };
  }

  let cumulative: Vec<f64> = min_sq_dist
    .iter()
    .scan(0.0, |acc, &d| {
      *acc += d;
      Some(*acc)
    })
    .collect();

  let mut clamped = 0;
  let ids = draws
    .iter()
    .map(|u| {
      let threshold = u * potential;
      let idx = cumulative.partition_point(|&c| c <= threshold);
      if idx > last {
        clamped += 1;
        last
      } else {
        idx
      }
    })
    .collect();

  Drawn {
    ids,
    clamped,
    uniform_fallback: false,
  }
}
