use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation token identifying one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Epoch(u64);

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of epochs; only the latest one is current
#[derive(Debug, Default)]
pub struct EpochClock {
    current: AtomicU64,
}

impl EpochClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier one
    pub fn advance(&self) -> Epoch {
        Epoch(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> Epoch {
        Epoch(self.current.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.current() == epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_supersedes() {
        let clock = EpochClock::new();
        let first = clock.advance();
        assert!(clock.is_current(first));

        let second = clock.advance();
        assert!(second > first);
        assert!(!clock.is_current(first));
        assert!(clock.is_current(second));
    }
}
