use crate::route::OverlaySet;
use crate::runner::Epoch;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Extracting,
    Dispatched { lookups: usize },
    Finalizing,
    Rendered,
    FallbackRendered,
}

impl Phase {
    /// Edges of the run state machine; starting a run is allowed from anywhere
    fn allows(self, next: Phase) -> bool {
        use Phase::*;
        match (self, next) {
            (_, Extracting) => true,
            (Extracting, Dispatched { .. } | Finalizing | Idle) => true,
            (Dispatched { .. }, Finalizing) => true,
            (Finalizing, Rendered | FallbackRendered | Idle) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Extracting => write!(f, "extracting"),
            Phase::Dispatched { lookups } => write!(f, "dispatched({})", lookups),
            Phase::Finalizing => write!(f, "finalizing"),
            Phase::Rendered => write!(f, "rendered"),
            Phase::FallbackRendered => write!(f, "fallback_rendered"),
        }
    }
}

/// Everything the pipeline remembers between runs.
///
/// Owned by a single controller; only the run holding the current epoch
/// may move the phase or touch the overlays.
#[derive(Debug)]
pub struct PipelineState {
    phase: Phase,
    epoch: Option<Epoch>,
    pub overlays: OverlaySet,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            epoch: None,
            overlays: OverlaySet::default(),
        }
    }
}

impl PipelineState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn epoch(&self) -> Option<Epoch> {
        self.epoch
    }

    /// Take ownership for a new run
    pub fn begin(&mut self, epoch: Epoch) {
        debug!("Run {} started (was {})", epoch, self.phase);
        self.epoch = Some(epoch);
        self.phase = Phase::Extracting;
    }

    /// Move to `next` on behalf of `epoch`; false if the run is stale or the edge is invalid
    pub fn transition(&mut self, epoch: Epoch, next: Phase) -> bool {
        if self.epoch != Some(epoch) {
            debug!("Ignoring {} -> {} from stale run {}", self.phase, next, epoch);
            return false;
        }
        if !self.phase.allows(next) {
            warn!("Invalid transition {} -> {} in run {}", self.phase, next, epoch);
            return false;
        }
        debug!("Run {}: {} -> {}", epoch, self.phase, next);
        self.phase = next;
        true
    }

    /// Return to idle with no owning run; every earlier run becomes stale
    pub fn reset(&mut self) {
        self.epoch = None;
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::EpochClock;

    #[test]
    fn test_happy_path_transitions() {
        let clock = EpochClock::new();
        let epoch = clock.advance();
        let mut state = PipelineState::default();
        assert_eq!(state.phase(), Phase::Idle);

        state.begin(epoch);
        assert!(state.transition(epoch, Phase::Dispatched { lookups: 3 }));
        assert!(state.transition(epoch, Phase::Finalizing));
        assert!(state.transition(epoch, Phase::Rendered));
        assert_eq!(state.phase(), Phase::Rendered);
    }

    #[test]
    fn test_stale_epoch_cannot_transition() {
        let clock = EpochClock::new();
        let old = clock.advance();
        let new = clock.advance();
        let mut state = PipelineState::default();

        state.begin(old);
        assert!(state.transition(old, Phase::Dispatched { lookups: 2 }));
        state.begin(new);
        assert!(!state.transition(old, Phase::Finalizing));
        assert_eq!(state.phase(), Phase::Extracting);
        assert_eq!(state.epoch(), Some(new));
    }

    #[test]
    fn test_reset_disowns_in_flight_run() {
        let clock = EpochClock::new();
        let epoch = clock.advance();
        let mut state = PipelineState::default();

        state.begin(epoch);
        assert!(state.transition(epoch, Phase::Dispatched { lookups: 1 }));
        state.reset();

        assert_eq!(state.epoch(), None);
        assert!(!state.transition(epoch, Phase::Finalizing));
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_invalid_edge_rejected() {
        let clock = EpochClock::new();
        let epoch = clock.advance();
        let mut state = PipelineState::default();

        state.begin(epoch);
        assert!(!state.transition(epoch, Phase::Rendered));
        assert_eq!(state.phase(), Phase::Extracting);
    }
}
