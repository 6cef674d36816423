//! Domain core for the GrainGuard nearby-storage experience.
//!
//! Pure geo math, the facility catalog and ranker, the location data model
//! shared with the provider crate, persisted preferences, and the small
//! pricing / temperature-dial helpers the screens are built on.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod dial;
pub mod error;
pub mod facilities;
pub mod geo;
pub mod location;
pub mod plans;
pub mod preferences;
pub mod rank;

pub use app_config::{AppConfig, Environment};
pub use catalog::{builtin_catalog, load_catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use facilities::{Facility, RankedFacility};
pub use geo::{
    directions_url, distance_km, format_distance, search_url, Coordinate, DirectionsProvider,
    DEFAULT_CENTER,
};
pub use location::{LocationError, LocationSample};
pub use preferences::{Language, MapToken, PreferenceStore, Preferences};
pub use rank::{rank, rank_or_fallback, FacilityFilter, NearbyFacilities, SampleOutcome};
