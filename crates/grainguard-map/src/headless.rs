//! In-memory [`MapEngine`] for terminals and tests.
//!
//! Keeps the live marker set and the last camera request so callers can
//! render a textual summary of what an interactive map would show.

use std::collections::BTreeMap;

use grainguard_core::Coordinate;

use crate::engine::{Camera, FitOptions, LngLatBounds, MapEngine, MarkerId, MarkerKind};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    pub position: Coordinate,
    pub kind: MarkerKind,
    pub label: String,
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    next_id: MarkerId,
    markers: BTreeMap<MarkerId, HeadlessMarker>,
    last_fit: Option<(LngLatBounds, FitOptions)>,
    camera: Option<Camera>,
    released: bool,
}

impl HeadlessEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live markers in creation order.
    pub fn markers(&self) -> impl Iterator<Item = &HeadlessMarker> {
        self.markers.values()
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn last_fit(&self) -> Option<(LngLatBounds, FitOptions)> {
        self.last_fit
    }

    #[must_use]
    pub fn camera(&self) -> Option<Camera> {
        self.camera
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl MapEngine for HeadlessEngine {
    fn add_marker(&mut self, position: Coordinate, kind: MarkerKind, label: &str) -> MarkerId {
        self.next_id += 1;
        self.markers.insert(
            self.next_id,
            HeadlessMarker {
                position,
                kind,
                label: label.to_string(),
            },
        );
        self.next_id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_none() {
            tracing::warn!(marker = id, "remove_marker for unknown id");
        }
    }

    fn fit_bounds(&mut self, bounds: LngLatBounds, options: FitOptions) {
        self.last_fit = Some((bounds, options));
    }

    fn fly_to(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    fn release(&mut self) {
        self.released = true;
    }
}
