//! Bounded polling with a fixed delay between attempts.

use crate::error::Result;
use std::thread;
use std::time::Duration;

/// How many times to probe and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl PollPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        PollPolicy { attempts, delay }
    }

    /// Poll without sleeping; for tests
    pub fn immediate(attempts: u32) -> Self {
        PollPolicy::new(attempts, Duration::ZERO)
    }

    /// Call `probe` until it yields a value or the attempts run out.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - The probe produced a definitive answer
    /// * `Ok(None)` - Every attempt was indeterminate
    /// * `Err` - The probe failed; polling stops immediately
    pub fn run<T, F>(&self, mut probe: F) -> Result<Option<T>>
    where
        F: FnMut(u32) -> Result<Option<T>>,
    {
        for attempt in 1..=self.attempts {
            if let Some(value) = probe(attempt)? {
                return Ok(Some(value));
            }
            if attempt < self.attempts && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }
        Ok(None)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::new(10, Duration::from_secs(2))
    }
}
