mod assembler;
mod surface;

pub use assembler::{OverlaySet, RouteAssembler};
pub use surface::{MapSurface, OverlayHandle, RecordingSurface};

use crate::geocode::Position;
use serde::Serialize;

/// Where a fresh surface is centred before anything is drawn (Beijing)
pub const DEFAULT_CENTER: Position = Position {
    lat: 39.915,
    lng: 116.404,
};

/// Zoom used for a single point
pub const SINGLE_POINT_ZOOM: u8 = 12;

const MIN_ZOOM: u8 = 3;
const MAX_ZOOM: u8 = 18;

/// A labeled point of an assembled route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    /// 1-based position along the route
    pub label: usize,
    pub name: String,
    pub position: Position,
}

/// Waypoints in itinerary order, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub waypoints: Vec<Waypoint>,

    /// Ordered line through every waypoint; present only with two or more
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Vec<Position>>,

    pub bounds: Bounds,
}

impl Route {
    pub fn positions(&self) -> Vec<Position> {
        self.waypoints.iter().map(|w| w.position).collect()
    }

    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.waypoints.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Bounding box of a set of positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_points(points: &[Position]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for p in &points[1..] {
            bounds.south = bounds.south.min(p.lat);
            bounds.north = bounds.north.max(p.lat);
            bounds.west = bounds.west.min(p.lng);
            bounds.east = bounds.east.max(p.lng);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Larger of the latitude and longitude spans, in degrees
    pub fn span(&self) -> f64 {
        (self.north - self.south).max(self.east - self.west)
    }
}

/// Map centre and zoom level enclosing a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Position,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: SINGLE_POINT_ZOOM,
        }
    }
}

impl Viewport {
    /// Fit the points; `None` when there are none
    pub fn fit(points: &[Position]) -> Option<Self> {
        let bounds = Bounds::from_points(points)?;
        let span = bounds.span();
        let zoom = if span <= f64::EPSILON {
            SINGLE_POINT_ZOOM
        } else {
            // Each zoom level halves the visible degrees, 360 at level 0
            let level = (360.0 / span).log2().floor();
            level.clamp(MIN_ZOOM as f64, MAX_ZOOM as f64) as u8
        };
        Some(Self {
            center: bounds.center(),
            zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_and_center() {
        let points = [
            Position::new(39.0, 116.0),
            Position::new(40.0, 117.0),
            Position::new(39.5, 115.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.south, 39.0);
        assert_eq!(bounds.north, 40.0);
        assert_eq!(bounds.west, 115.0);
        assert_eq!(bounds.east, 117.0);
        assert_eq!(bounds.center(), Position::new(39.5, 116.0));
        assert_eq!(bounds.span(), 2.0);
    }

    #[test]
    fn test_viewport_zoom() {
        assert!(Viewport::fit(&[]).is_none());

        let single = Viewport::fit(&[Position::new(35.68, 139.69)]).unwrap();
        assert_eq!(single.zoom, SINGLE_POINT_ZOOM);
        assert_eq!(single.center, Position::new(35.68, 139.69));

        // 360 / 2 = 180 -> log2 ~ 7.49
        let city =
            Viewport::fit(&[Position::new(39.0, 115.0), Position::new(40.0, 117.0)]).unwrap();
        assert_eq!(city.zoom, 7);

        let street =
            Viewport::fit(&[Position::new(39.9, 116.39), Position::new(39.9, 116.39001)]).unwrap();
        assert_eq!(street.zoom, MAX_ZOOM);

        let world =
            Viewport::fit(&[Position::new(-60.0, -170.0), Position::new(70.0, 170.0)]).unwrap();
        assert_eq!(world.zoom, MIN_ZOOM);
    }
}
