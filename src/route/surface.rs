use super::{Viewport, SINGLE_POINT_ZOOM};
use crate::geocode::Position;
use serde::Serialize;
use std::collections::BTreeMap;

/// Opaque reference to something drawn on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OverlayHandle(u64);

/// Passive rendering target.
///
/// The pipeline is the only writer; surfaces never call back into it.
pub trait MapSurface: Send {
    /// Prepare the surface; false if it cannot be used
    fn initialize(&mut self) -> bool;

    fn is_ready(&self) -> bool;

    fn add_marker(&mut self, position: Position, label: &str) -> OverlayHandle;

    fn add_polyline(&mut self, points: &[Position]) -> OverlayHandle;

    /// Unknown or already removed handles are ignored
    fn remove_overlay(&mut self, handle: OverlayHandle);

    /// Centre and zoom the surface on the points
    fn fit_viewport(&mut self, points: &[Position]) -> Viewport;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Marker { position: Position, label: String },
    Polyline { points: Vec<Position> },
}

/// In-memory surface that records what is currently drawn
#[derive(Debug)]
pub struct RecordingSurface {
    available: bool,
    ready: bool,
    next_handle: u64,
    overlays: BTreeMap<OverlayHandle, Overlay>,
    viewport: Viewport,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            available: true,
            ready: false,
            next_handle: 0,
            overlays: BTreeMap::new(),
            viewport: Viewport::default(),
        }
    }

    /// A surface whose initialization always fails
    #[cfg(test)]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Marker labels in drawing order
    #[cfg(test)]
    pub fn marker_labels(&self) -> Vec<String> {
        self.overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Marker { label, .. } => Some(label.clone()),
                Overlay::Polyline { .. } => None,
            })
            .collect()
    }

    #[cfg(test)]
    pub fn polylines(&self) -> Vec<&[Position]> {
        self.overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Polyline { points } => Some(points.as_slice()),
                Overlay::Marker { .. } => None,
            })
            .collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn insert(&mut self, overlay: Overlay) -> OverlayHandle {
        self.next_handle += 1;
        let handle = OverlayHandle(self.next_handle);
        self.overlays.insert(handle, overlay);
        handle
    }
}

impl MapSurface for RecordingSurface {
    fn initialize(&mut self) -> bool {
        self.ready = self.available;
        self.ready
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn add_marker(&mut self, position: Position, label: &str) -> OverlayHandle {
        self.insert(Overlay::Marker {
            position,
            label: label.to_string(),
        })
    }

    fn add_polyline(&mut self, points: &[Position]) -> OverlayHandle {
        self.insert(Overlay::Polyline {
            points: points.to_vec(),
        })
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) {
        self.overlays.remove(&handle);
    }

    fn fit_viewport(&mut self, points: &[Position]) -> Viewport {
        if let Some(viewport) = Viewport::fit(points) {
            self.viewport = viewport;
        } else {
            self.viewport.zoom = SINGLE_POINT_ZOOM;
        }
        self.viewport
    }
}
