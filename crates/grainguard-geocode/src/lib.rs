//! Forward and reverse geocoding against a Mapbox-compatible places API.
//!
//! Geocoding is cosmetic in GrainGuard, so the public operations never fail:
//! any transport, status, or parse problem degrades to
//! [`UNKNOWN_LOCATION`] or an empty result list.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GeocodingClient, UNKNOWN_LOCATION};
pub use error::GeocodeError;
pub use types::GeocodeHit;
