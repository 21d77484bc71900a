//! Input validation errors.

use thiserror::Error;

/// Caller contract violations. All of them are reported synchronously at the
/// offending call and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid digit {0}: expected a value in 0..=9")]
    InvalidDigit(i64),

    #[error("Invalid window capacity {0}: must be at least 1")]
    InvalidCapacity(usize),
}
