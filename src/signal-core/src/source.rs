//! Digit stream sources.
//!
//! Sources yield raw values; validation happens when the value is pushed
//! into the window.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Producer of raw digit observations.
#[cfg_attr(test, mockall::automock)]
pub trait DigitSource {
    /// Next observation, or `None` once the source is exhausted.
    fn next_digit(&mut self) -> Option<i64>;
}

/// Uniform 0..=9 stream.
pub struct RandomDigitSource {
    rng: StdRng,
}

impl RandomDigitSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible stream for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fill a batch, e.g. to pre-seed a window at session start.
    pub fn take_batch(&mut self, len: usize) -> Vec<i64> {
        (0..len).map(|_| self.rng.random_range(0..10)).collect()
    }
}

impl Default for RandomDigitSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitSource for RandomDigitSource {
    fn next_digit(&mut self) -> Option<i64> {
        Some(self.rng.random_range(0..10))
    }
}

/// Plays back a recorded sequence, once or on repeat.
pub struct ReplaySource {
    values: Vec<i64>,
    position: usize,
    looping: bool,
}

impl ReplaySource {
    pub fn once(values: Vec<i64>) -> Self {
        Self {
            values,
            position: 0,
            looping: false,
        }
    }

    pub fn looping(values: Vec<i64>) -> Self {
        Self {
            values,
            position: 0,
            looping: true,
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.position)
    }
}

impl DigitSource for ReplaySource {
    fn next_digit(&mut self) -> Option<i64> {
        if self.position >= self.values.len() {
            if !self.looping || self.values.is_empty() {
                return None;
            }
            self.position = 0;
        }
        let value = self.values[self.position];
        self.position += 1;
        Some(value)
    }
}
