//! Random source used by seeding
//!
//! Randomness is always passed in explicitly so runs are reproducible from a
//! seeded generator. Any `rand::Rng` works as a `SeedRng`.

use rand::Rng;

/// Uniform draws needed by the sampler and the reducer
pub trait SeedRng {
  /// Uniform index in `[0, n)`. `n` must be positive.
  fn uniform_index(&mut self, n: usize) -> usize;

  /// Fill `out` with independent uniform reals in `[0, 1)`
  fn uniform_reals(&mut self, out: &mut [f64]);

  /// Single uniform real in `[0, 1)`
  fn uniform_real(&mut self) -> f64 {
    let mut value = [0.0];
    self.uniform_reals(&mut value);
    value[0]
  }
}

impl<R: Rng + ?Sized> SeedRng for R {
  fn uniform_index(&mut self, n: usize) -> usize {
    self.gen_range(0..n)
  }

  fn uniform_reals(&mut self, out: &mut [f64]) {
    for value in out.iter_mut() {
      *value = self.gen::<f64>();
    }
  }
}
