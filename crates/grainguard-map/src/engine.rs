//! The seam between [`crate::MapView`] and whatever actually draws the map.

use grainguard_core::Coordinate;

/// Handle returned by [`MapEngine::add_marker`]. Only meaningful to the
/// engine that issued it.
pub type MarkerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Facility,
    User,
}

/// Camera position requested by the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Coordinate,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Screen pixels kept clear around the fitted bounds.
    pub padding: u32,
    /// Zoom ceiling so tightly clustered markers do not over-zoom.
    pub max_zoom: f64,
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLatBounds {
    min_lat: f64,
    min_lng: f64,
    max_lat: f64,
    max_lng: f64,
}

impl LngLatBounds {
    /// Degenerate box around a single point.
    #[must_use]
    pub fn around(point: Coordinate) -> Self {
        Self {
            min_lat: point.lat(),
            min_lng: point.lng(),
            max_lat: point.lat(),
            max_lng: point.lng(),
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::around(points.next()?);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.min_lat = self.min_lat.min(point.lat());
        self.min_lng = self.min_lng.min(point.lng());
        self.max_lat = self.max_lat.max(point.lat());
        self.max_lng = self.max_lng.max(point.lng());
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat())
            && (self.min_lng..=self.max_lng).contains(&point.lng())
    }

    #[must_use]
    pub fn south_west(&self) -> (f64, f64) {
        (self.min_lat, self.min_lng)
    }

    #[must_use]
    pub fn north_east(&self) -> (f64, f64) {
        (self.max_lat, self.max_lng)
    }

    /// Midpoint of the box. Corners are always valid coordinates, so the
    /// midpoint is too.
    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
        .ok()
    }
}

/// Rendering backend driven by [`crate::MapView`].
///
/// Implementations must tolerate `remove_marker` for every id they issued,
/// and expect no calls after `release`.
pub trait MapEngine {
    fn add_marker(&mut self, position: Coordinate, kind: MarkerKind, label: &str) -> MarkerId;

    fn remove_marker(&mut self, id: MarkerId);

    fn fit_bounds(&mut self, bounds: LngLatBounds, options: FitOptions);

    fn fly_to(&mut self, camera: Camera);

    /// Frees the rendering context. Called once, after every marker has been
    /// removed.
    fn release(&mut self);
}
