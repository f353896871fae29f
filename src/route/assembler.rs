use super::{Bounds, MapSurface, OverlayHandle, Route, Viewport, Waypoint};
use crate::extract::AttractionCandidate;
use crate::geocode::Position;
use crate::runner::GeocodeResult;
use std::collections::HashMap;
use tracing::{debug, info};

/// Overlays currently drawn by the pipeline on its surface
#[derive(Debug, Default)]
pub struct OverlaySet {
    markers: Vec<OverlayHandle>,
    polyline: Option<OverlayHandle>,
}

impl OverlaySet {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.polyline.is_none()
    }

    #[cfg(test)]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[cfg(test)]
    pub fn has_polyline(&self) -> bool {
        self.polyline.is_some()
    }
}

pub struct RouteAssembler;

impl RouteAssembler {
    /// Restore itinerary order and label the points 1..K.
    ///
    /// Arrival order of `results` is irrelevant; `None` when nothing resolved.
    pub fn assemble(
        candidates: &[AttractionCandidate],
        mut results: Vec<GeocodeResult>,
    ) -> Option<Route> {
        let names: HashMap<usize, &str> = candidates
            .iter()
            .map(|c| (c.source_index, c.name.as_str()))
            .collect();

        results.sort_by_key(|r| r.source_index);

        let waypoints: Vec<Waypoint> = results
            .into_iter()
            .filter_map(|r| {
                names
                    .get(&r.source_index)
                    .map(|name| (name.to_string(), r.position))
            })
            .enumerate()
            .map(|(i, (name, position))| Waypoint {
                label: i + 1,
                name,
                position,
            })
            .collect();

        Self::from_waypoints(waypoints)
    }

    /// A one-point route for a destination
    pub fn single(name: &str, position: Position) -> Route {
        Route {
            waypoints: vec![Waypoint {
                label: 1,
                name: name.to_string(),
                position,
            }],
            polyline: None,
            bounds: Bounds {
                south: position.lat,
                west: position.lng,
                north: position.lat,
                east: position.lng,
            },
        }
    }

    fn from_waypoints(waypoints: Vec<Waypoint>) -> Option<Route> {
        let positions: Vec<Position> = waypoints.iter().map(|w| w.position).collect();
        let bounds = Bounds::from_points(&positions)?;
        let polyline = if positions.len() >= 2 {
            Some(positions)
        } else {
            None
        };
        Some(Route {
            waypoints,
            polyline,
            bounds,
        })
    }

    /// Remove everything a previous run drew. Safe to call repeatedly.
    pub fn clear<S: MapSurface + ?Sized>(surface: &mut S, overlays: &mut OverlaySet) {
        if overlays.is_empty() {
            return;
        }
        let markers = overlays.markers.len();
        for handle in overlays.markers.drain(..) {
            surface.remove_overlay(handle);
        }
        if let Some(handle) = overlays.polyline.take() {
            surface.remove_overlay(handle);
        }
        debug!("Cleared {} markers and route line", markers);
    }

    /// Clear, then draw numbered markers, the route line and fit the view
    pub fn draw<S: MapSurface + ?Sized>(
        surface: &mut S,
        overlays: &mut OverlaySet,
        route: &Route,
    ) -> Viewport {
        Self::clear(surface, overlays);

        for waypoint in &route.waypoints {
            let label = format!("{}. {}", waypoint.label, waypoint.name);
            overlays
                .markers
                .push(surface.add_marker(waypoint.position, &label));
        }

        if let Some(points) = &route.polyline {
            overlays.polyline = Some(surface.add_polyline(points));
        }

        let viewport = surface.fit_viewport(&route.positions());
        info!(
            "Drew {} waypoints, centred at {} zoom {}",
            route.len(),
            viewport.center,
            viewport.zoom
        );
        viewport
    }
}
