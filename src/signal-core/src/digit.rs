//! Validated single-digit observations.

use std::fmt;

use serde::Serialize;

use crate::error::InputError;

/// A digit in `0..=9`. Construction is the only validation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Digit(u8);

impl Digit {
    pub const MAX: u8 = 9;

    /// Validate a raw observation.
    pub fn new(value: i64) -> Result<Self, InputError> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InputError::InvalidDigit(value))
        }
    }

    /// Digit for a counter slot. Callers index with `0..DIGIT_COUNT`.
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= Self::MAX as usize);
        Self(index as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All ten digits in ascending order.
    pub fn all() -> impl Iterator<Item = Digit> {
        (0..=Self::MAX).map(Digit)
    }
}

impl TryFrom<i64> for Digit {
    type Error = InputError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
