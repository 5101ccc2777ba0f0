//! Worker-pool sizing.

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// Number of workers in a scan pool. Never zero: a pool without workers
/// would never drain its job queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Concurrency(NonZeroUsize);

impl Concurrency {
    /// A single worker; probes run one after another.
    pub const SERIAL: Self = Self(NonZeroUsize::MIN);

    /// Validate a raw worker count.
    pub fn new(workers: usize) -> Result<Self, ScanError> {
        NonZeroUsize::new(workers)
            .map(Self)
            .ok_or(ScanError::InvalidConcurrency(workers))
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Concurrency {
    type Error = ScanError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Concurrency> for usize {
    fn from(c: Concurrency) -> Self {
        c.get()
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            Concurrency::new(0),
            Err(ScanError::InvalidConcurrency(0))
        ));
    }

    #[test]
    fn test_valid_values() {
        assert_eq!(Concurrency::new(1).unwrap(), Concurrency::SERIAL);
        assert_eq!(Concurrency::new(100).unwrap().get(), 100);
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Concurrency>("0").is_err());
        let c: Concurrency = serde_json::from_str("50").unwrap();
        assert_eq!(c.get(), 50);
    }
}
