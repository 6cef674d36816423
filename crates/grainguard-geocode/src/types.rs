//! Places API response types.
//!
//! Only the fields the client reads are modelled; everything else in the
//! GeoJSON payload is ignored. A missing `features` array means no results.

use grainguard_core::Coordinate;
use serde::{Deserialize, Serialize};

/// `GET /geocoding/v5/{dataset}.places/{query}.json` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    /// `[longitude, latitude]`.
    #[serde(default)]
    pub center: Option<Vec<f64>>,
    #[serde(default)]
    pub place_name: Option<String>,
}

impl Feature {
    pub(crate) fn coordinate(&self) -> Option<Coordinate> {
        match self.center.as_deref() {
            Some([lng, lat, ..]) => Coordinate::new(*lat, *lng).ok(),
            _ => None,
        }
    }
}

/// One forward-geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeHit {
    pub coordinate: Coordinate,
    pub label: String,
}
