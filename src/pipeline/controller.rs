use crate::config::PipelineConfig;
use crate::error::{ExtractError, PipelineError};
use crate::extract::{AttractionCandidate, AttractionExtractor, Extraction};
use crate::geocode::{scope_for, Geocoder};
use crate::plan::ItineraryPlan;
use crate::route::{MapSurface, Route, RouteAssembler, Viewport};
use crate::runner::{BatchOutcome, Epoch, EpochClock, GeocodeCoordinator};
use crate::state::{Phase, PipelineState};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::report::{RunOutcome, RunReport};

/// State and surface, always locked together so that the epoch check and
/// the drawing it guards cannot interleave with another run.
struct Session<S> {
    state: PipelineState,
    surface: S,
}

/// Single owner of the pipeline state and of everything drawn on the surface
pub struct Pipeline<S: MapSurface> {
    extractor: AttractionExtractor,
    coordinator: GeocodeCoordinator,
    scope_suffixes: Vec<String>,
    clock: EpochClock,
    session: Mutex<Session<S>>,
}

impl<S: MapSurface> Pipeline<S> {
    pub fn new(
        config: &PipelineConfig,
        geocoder: Arc<dyn Geocoder>,
        surface: S,
    ) -> Result<Self, ExtractError> {
        Ok(Self {
            extractor: AttractionExtractor::new(config)?,
            coordinator: GeocodeCoordinator::new(
                geocoder,
                config.lookup_timeout(),
                config.batch_deadline(),
            ),
            scope_suffixes: config.scope_suffixes.clone(),
            clock: EpochClock::new(),
            session: Mutex::new(Session {
                state: PipelineState::default(),
                surface,
            }),
        })
    }

    pub fn extractor(&self) -> &AttractionExtractor {
        &self.extractor
    }

    /// Search scope used for a destination
    pub fn scope(&self, destination: Option<&str>) -> String {
        destination
            .map(|d| scope_for(d, &self.scope_suffixes))
            .unwrap_or_default()
    }

    pub async fn phase(&self) -> Phase {
        self.session.lock().await.state.phase()
    }

    pub async fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let session = self.session.lock().await;
        f(&session.surface)
    }

    /// Geolocate a plan's attractions and draw them as a numbered route
    pub async fn run(&self, plan: &ItineraryPlan) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        let epoch = self.begin().await?;
        let mut report = RunReport::new(epoch, self.coordinator.geocoder_name());

        let extraction = self.extractor.extract(plan);
        report.candidates = extraction.candidates();

        match extraction {
            Extraction::Empty => {
                report.diagnostics.push(PipelineError::ExtractionEmpty);
                report.outcome = self.settle_idle(epoch).await;
            }
            Extraction::Fallback(candidate) => {
                report.diagnostics.push(PipelineError::ExtractionEmpty);
                if self.advance(epoch, Phase::Finalizing).await {
                    let phase = Phase::FallbackRendered;
                    self.render_destination(epoch, &candidate.name, phase, &mut report)
                        .await;
                } else {
                    report.outcome = RunOutcome::Superseded;
                }
            }
            Extraction::Candidates(candidates) => {
                self.geolocate(epoch, plan.destination(), &candidates, &mut report)
                    .await;
            }
        }

        if report.outcome == RunOutcome::Superseded {
            report.diagnostics.push(PipelineError::StaleEpoch);
        }
        report.duration = started.elapsed();
        info!("Run {} finished: {}", epoch, report.outcome);
        Ok(report)
    }

    /// Draw a single destination point, superseding any route on the surface
    pub async fn show_destination(&self, destination: &str) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        let epoch = self.begin().await?;
        let mut report = RunReport::new(epoch, self.coordinator.geocoder_name());
        let destination = destination.trim();

        if destination.is_empty() {
            report.diagnostics.push(PipelineError::ExtractionEmpty);
            report.outcome = self.settle_idle(epoch).await;
        } else {
            report.candidates = vec![AttractionCandidate {
                name: destination.to_string(),
                source_index: 0,
            }];
            if self.advance(epoch, Phase::Finalizing).await {
                self.render_destination(epoch, destination, Phase::Rendered, &mut report)
                    .await;
            } else {
                report.outcome = RunOutcome::Superseded;
            }
        }

        if report.outcome == RunOutcome::Superseded {
            report.diagnostics.push(PipelineError::StaleEpoch);
        }
        report.duration = started.elapsed();
        info!("Destination run {} finished: {}", epoch, report.outcome);
        Ok(report)
    }

    /// Claim a new epoch, making every earlier run stale
    async fn begin(&self) -> Result<Epoch, PipelineError> {
        let mut session = self.session.lock().await;
        if !session.surface.is_ready() && !session.surface.initialize() {
            warn!("Map surface unavailable, run aborted");
            // Nothing earlier may draw onto a surface that has gone away
            self.clock.advance();
            session.state.reset();
            return Err(PipelineError::SurfaceUnavailable);
        }
        let epoch = self.clock.advance();
        session.state.begin(epoch);
        Ok(epoch)
    }

    async fn advance(&self, epoch: Epoch, next: Phase) -> bool {
        self.session.lock().await.state.transition(epoch, next)
    }

    async fn geolocate(
        &self,
        epoch: Epoch,
        destination: Option<&str>,
        candidates: &[AttractionCandidate],
        report: &mut RunReport,
    ) {
        let lookups = candidates.len();
        if !self.advance(epoch, Phase::Dispatched { lookups }).await {
            report.outcome = RunOutcome::Superseded;
            return;
        }

        let scope = self.scope(destination);
        let batch = match self
            .coordinator
            .dispatch(epoch, &self.clock, candidates, &scope)
            .await
        {
            BatchOutcome::Finished(batch) => batch,
            BatchOutcome::Superseded => {
                report.outcome = RunOutcome::Superseded;
                return;
            }
        };

        for failure in batch.failures {
            report.diagnostics.push(PipelineError::GeocodeFailure {
                name: failure.name,
                source: failure.error,
            });
        }
        if batch.timed_out {
            report.diagnostics.push(PipelineError::BatchTimeout {
                completed: batch.completed,
                expected: batch.expected,
            });
        }

        if !self.advance(epoch, Phase::Finalizing).await {
            report.outcome = RunOutcome::Superseded;
            return;
        }

        match RouteAssembler::assemble(candidates, batch.results) {
            Some(route) => {
                report.outcome = match self.draw(epoch, &route, Phase::Rendered).await {
                    Some(viewport) => {
                        report.viewport = Some(viewport);
                        RunOutcome::Rendered(route)
                    }
                    None => RunOutcome::Superseded,
                };
            }
            None => {
                report.diagnostics.push(PipelineError::AllGeocodeFailed);
                match destination {
                    Some(destination) => {
                        info!("All lookups failed, showing destination {}", destination);
                        self.render_destination(epoch, destination, Phase::FallbackRendered, report)
                            .await;
                    }
                    None => {
                        info!("All lookups failed and no destination to fall back to");
                        report.outcome = self.settle_idle(epoch).await;
                    }
                }
            }
        }
    }

    /// One lookup for a destination, drawn as a single point
    async fn render_destination(
        &self,
        epoch: Epoch,
        destination: &str,
        phase: Phase,
        report: &mut RunReport,
    ) {
        let position = match self.coordinator.lookup_one(destination, destination).await {
            Ok(position) => position,
            Err(error) => {
                warn!("Failed to geocode destination {}: {}", destination, error);
                report.diagnostics.push(PipelineError::GeocodeFailure {
                    name: destination.to_string(),
                    source: error,
                });
                report.outcome = self.settle_idle(epoch).await;
                return;
            }
        };

        let route = RouteAssembler::single(destination, position);
        report.outcome = match self.draw(epoch, &route, phase).await {
            Some(viewport) => {
                report.viewport = Some(viewport);
                match phase {
                    Phase::FallbackRendered => RunOutcome::FallbackRendered(route),
                    _ => RunOutcome::Rendered(route),
                }
            }
            None => RunOutcome::Superseded,
        };
    }

    /// Clear-before-draw, only while `epoch` is still current
    async fn draw(&self, epoch: Epoch, route: &Route, phase: Phase) -> Option<Viewport> {
        let mut session = self.session.lock().await;
        if !self.clock.is_current(epoch) {
            return None;
        }
        let Session { state, surface } = &mut *session;
        let viewport = RouteAssembler::draw(surface, &mut state.overlays, route);
        state.transition(epoch, phase);
        Some(viewport)
    }

    /// End the run with nothing drawn
    async fn settle_idle(&self, epoch: Epoch) -> RunOutcome {
        let mut session = self.session.lock().await;
        if !self.clock.is_current(epoch) {
            return RunOutcome::Superseded;
        }
        let Session { state, surface } = &mut *session;
        RouteAssembler::clear(surface, &mut state.overlays);
        state.transition(epoch, Phase::Idle);
        RunOutcome::Idle
    }
}
