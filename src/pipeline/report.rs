use crate::error::PipelineError;
use crate::extract::AttractionCandidate;
use crate::route::{Route, Viewport};
use crate::runner::Epoch;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Attractions resolved and drawn as a numbered route
    Rendered(Route),
    /// Only the destination could be drawn
    FallbackRendered(Route),
    /// Nothing drawn
    Idle,
    /// A newer run took over; nothing from this run was drawn
    Superseded,
}

impl RunOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            RunOutcome::Rendered(route) | RunOutcome::FallbackRendered(route) => Some(route),
            RunOutcome::Idle | RunOutcome::Superseded => None,
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Rendered(route) => write!(f, "rendered ({} waypoints)", route.len()),
            RunOutcome::FallbackRendered(_) => write!(f, "fallback rendered (destination only)"),
            RunOutcome::Idle => write!(f, "idle"),
            RunOutcome::Superseded => write!(f, "superseded"),
        }
    }
}

/// What one pipeline run did
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub epoch: Epoch,
    pub geocoder: &'static str,
    pub candidates: Vec<AttractionCandidate>,
    pub outcome: RunOutcome,
    pub viewport: Option<Viewport>,
    /// Absorbed failures, in the order they were observed
    pub diagnostics: Vec<PipelineError>,
    pub duration: Duration,
}

impl RunReport {
    pub(crate) fn new(epoch: Epoch, geocoder: &'static str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            epoch,
            geocoder,
            candidates: Vec::new(),
            outcome: RunOutcome::Idle,
            viewport: None,
            diagnostics: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.outcome.route()
    }

    pub fn failed_lookups(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, PipelineError::GeocodeFailure { .. }))
            .count()
    }

    pub fn timed_out(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, PipelineError::BatchTimeout { .. }))
    }
}
