//! Bounded FIFO window over the digit stream.

use std::collections::VecDeque;

use crate::digit::Digit;
use crate::error::InputError;

/// Upper bound on the up-front allocation; larger windows grow on demand.
const PREALLOC_LIMIT: usize = 1024;

/// Sliding window of the most recent digits.
///
/// `len() <= capacity()` holds after every operation. The oldest digit is
/// evicted first.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    digits: VecDeque<Digit>,
    capacity: usize,
}

impl SlidingWindow {
    /// Create an empty window.
    pub fn new(capacity: usize) -> Result<Self, InputError> {
        if capacity < 1 {
            return Err(InputError::InvalidCapacity(capacity));
        }
        Ok(Self {
            digits: VecDeque::with_capacity(capacity.min(PREALLOC_LIMIT)),
            capacity,
        })
    }

    /// Append a raw observation, evicting from the front on overflow.
    pub fn push(&mut self, value: i64) -> Result<Digit, InputError> {
        let digit = Digit::new(value)?;
        self.digits.push_back(digit);
        self.trim();
        Ok(digit)
    }

    /// Change the capacity. Shrinking drops the oldest digits; growing does
    /// not backfill.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), InputError> {
        if capacity < 1 {
            return Err(InputError::InvalidCapacity(capacity));
        }
        self.capacity = capacity;
        self.trim();
        Ok(())
    }

    /// Replace the contents with a pre-validated batch.
    ///
    /// The whole batch is validated before anything changes, so a bad value
    /// leaves the window untouched. Only the newest `capacity` values are kept.
    pub fn seed<I>(&mut self, values: I) -> Result<(), InputError>
    where
        I: IntoIterator<Item = i64>,
    {
        let digits = values
            .into_iter()
            .map(Digit::new)
            .collect::<Result<Vec<_>, _>>()?;
        self.digits.clear();
        self.digits.extend(digits);
        self.trim();
        Ok(())
    }

    /// Oldest-first copy of the current contents.
    pub fn snapshot(&self) -> Vec<Digit> {
        self.digits.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn trim(&mut self) {
        while self.digits.len() > self.capacity {
            self.digits.pop_front();
        }
    }
}
