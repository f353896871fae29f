use crate::error::GeocodeError;
use crate::extract::AttractionCandidate;
use crate::geocode::{scoped_query, Geocoder, Position};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout as tokio_timeout};
use tracing::{debug, info, warn};

use super::epoch::{Epoch, EpochClock};

/// A successful lookup, tagged with the candidate it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub source_index: usize,
    pub position: Position,
}

#[derive(Debug)]
pub struct LookupFailure {
    pub name: String,
    pub error: GeocodeError,
}

/// One lookup arriving back at the fan-in
struct Completion {
    source_index: usize,
    name: String,
    outcome: Result<Position, GeocodeError>,
}

/// Counter and buffer shared by every completion of one epoch
struct FanIn {
    expected: usize,
    completed: usize,
    results: Vec<GeocodeResult>,
    failures: Vec<LookupFailure>,
}

impl FanIn {
    fn new(expected: usize) -> Self {
        Self {
            expected,
            completed: 0,
            results: Vec::with_capacity(expected),
            failures: Vec::new(),
        }
    }

    /// Returns true once every dispatched lookup has reported
    fn record(&mut self, completion: Completion) -> bool {
        self.completed += 1;
        match completion.outcome {
            Ok(position) => {
                debug!("Geocoded {} -> {}", completion.name, position);
                self.results.push(GeocodeResult {
                    source_index: completion.source_index,
                    position,
                });
            }
            Err(error) => {
                warn!("Failed to geocode {}: {}", completion.name, error);
                self.failures.push(LookupFailure {
                    name: completion.name,
                    error,
                });
            }
        }
        self.completed >= self.expected
    }

    fn finish(self, timed_out: bool) -> BatchReport {
        BatchReport {
            expected: self.expected,
            completed: self.completed,
            timed_out,
            results: self.results,
            failures: self.failures,
        }
    }
}

/// Everything one epoch collected before it finalized
#[derive(Debug)]
pub struct BatchReport {
    pub expected: usize,
    pub completed: usize,
    /// Finalized by the batch deadline rather than the counter
    pub timed_out: bool,
    /// In arrival order
    pub results: Vec<GeocodeResult>,
    pub failures: Vec<LookupFailure>,
}

#[derive(Debug)]
pub enum BatchOutcome {
    Finished(BatchReport),
    /// A newer run started before this batch finalized
    Superseded,
}

/// Fans out one lookup per candidate and fans the completions back in exactly once
pub struct GeocodeCoordinator {
    geocoder: Arc<dyn Geocoder>,
    lookup_timeout: Duration,
    batch_deadline: Duration,
}

impl GeocodeCoordinator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        lookup_timeout: Duration,
        batch_deadline: Duration,
    ) -> Self {
        Self {
            geocoder,
            lookup_timeout,
            batch_deadline,
        }
    }

    pub fn geocoder_name(&self) -> &'static str {
        self.geocoder.name()
    }

    /// Resolve a single query, bounded by the lookup timeout
    pub async fn lookup_one(
        &self,
        query: &str,
        scope_hint: &str,
    ) -> Result<Position, GeocodeError> {
        bounded_lookup(self.geocoder.as_ref(), self.lookup_timeout, query, scope_hint).await
    }

    pub async fn dispatch(
        &self,
        epoch: Epoch,
        clock: &EpochClock,
        candidates: &[AttractionCandidate],
        scope: &str,
    ) -> BatchOutcome {
        let mut fan_in = FanIn::new(candidates.len());
        if candidates.is_empty() {
            return BatchOutcome::Finished(fan_in.finish(false));
        }

        info!(
            "Dispatching {} lookups via {} (epoch {}, scope '{}')",
            candidates.len(),
            self.geocoder.name(),
            epoch,
            scope
        );

        // In-flight lookups cannot be cancelled; tasks left behind by a
        // superseded or expired batch run to completion and are dropped.
        let mut lookups = FuturesUnordered::new();
        for candidate in candidates {
            let geocoder = self.geocoder.clone();
            let query = scoped_query(scope, &candidate.name);
            let scope_hint = scope.to_string();
            let lookup_timeout = self.lookup_timeout;
            let source_index = candidate.source_index;
            let name = candidate.name.clone();

            let task = tokio::spawn(async move {
                bounded_lookup(geocoder.as_ref(), lookup_timeout, &query, &scope_hint).await
            });

            lookups.push(async move {
                let outcome = match task.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(GeocodeError::Aborted(e.to_string())),
                };
                Completion {
                    source_index,
                    name,
                    outcome,
                }
            });
        }

        let deadline = sleep(self.batch_deadline);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;

                next = lookups.next() => {
                    let Some(completion) = next else {
                        return BatchOutcome::Finished(fan_in.finish(false));
                    };
                    if !clock.is_current(epoch) {
                        debug!(
                            "Discarding late result for {} from superseded epoch {}",
                            completion.name, epoch
                        );
                        return BatchOutcome::Superseded;
                    }
                    if fan_in.record(completion) {
                        info!(
                            "Batch {} complete: {} of {} resolved",
                            epoch,
                            fan_in.results.len(),
                            fan_in.expected
                        );
                        return BatchOutcome::Finished(fan_in.finish(false));
                    }
                }
                _ = &mut deadline => {
                    if !clock.is_current(epoch) {
                        return BatchOutcome::Superseded;
                    }
                    warn!(
                        "Batch {} deadline of {:?} expired with {} of {} lookups complete",
                        epoch, self.batch_deadline, fan_in.completed, fan_in.expected
                    );
                    return BatchOutcome::Finished(fan_in.finish(true));
                }
            }
        }
    }
}

/// One geocode call; running past `limit` is reported as a timeout
async fn bounded_lookup(
    geocoder: &dyn Geocoder,
    limit: Duration,
    query: &str,
    scope_hint: &str,
) -> Result<Position, GeocodeError> {
    match tokio_timeout(limit, geocoder.geocode(query, scope_hint)).await {
        Ok(result) => result,
        Err(_) => Err(GeocodeError::Timeout(limit)),
    }
}
