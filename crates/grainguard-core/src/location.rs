//! Location data shared between the device provider and the ranker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;

/// One position fix from the device. A newer sample replaces the previous
/// one outright; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub coordinate: Coordinate,
    /// Radius of the 95% confidence circle, in metres.
    pub accuracy_meters: f64,
    pub captured_at: DateTime<Utc>,
}

/// Why a location request ended without a sample.
///
/// Terminal for the request that produced it, but a previously obtained
/// [`LocationSample`] stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("geolocation unsupported")]
    Unsupported,
}

impl LocationError {
    /// Message shown inline next to the facility list.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location permission denied. Please enable location access."
            }
            LocationError::PositionUnavailable => "Location information is unavailable.",
            LocationError::Timeout => "Location request timed out.",
            LocationError::Unsupported => "Geolocation is not supported on this device.",
        }
    }
}
