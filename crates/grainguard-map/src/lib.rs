//! Map presentation for ranked facilities.
//!
//! [`MapView`] drives any [`MapEngine`] implementation: it owns every marker
//! handle it creates, recreates the facility markers on each refresh, fits
//! the viewport, tracks selection, and tears everything down before the
//! engine itself is released.

pub mod engine;
pub mod error;
pub mod headless;
pub mod view;

pub use engine::{Camera, FitOptions, LngLatBounds, MapEngine, MarkerId, MarkerKind};
pub use error::MapError;
pub use headless::{HeadlessEngine, HeadlessMarker};
pub use view::{
    MapState, MapView, MapViewState, DEFAULT_ZOOM, FIT_MAX_ZOOM, FIT_PADDING, LOCATE_ZOOM,
    SELECT_ZOOM,
};
