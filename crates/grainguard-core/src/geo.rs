//! Great-circle geometry and map deep links.
//!
//! Distances use the haversine formula on a spherical Earth. That is accurate
//! to well under one percent at city scale, which is all the facility list
//! needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Bengaluru city center. Used as the reference point until the device
/// reports a position.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 12.971_6,
    lng: 77.594_6,
};

/// A WGS84 latitude/longitude pair in degrees.
///
/// Construction through [`Coordinate::new`] (and deserialization) rejects
/// values outside `[-90, 90]` / `[-180, 180]`, so every `Coordinate` in the
/// system is in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is
    /// non-finite or out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
        if lat_ok && lng_ok {
            Ok(Self { lat, lng })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    /// In-range literal for compile-time tables. Callers guarantee the bounds.
    pub(crate) const fn from_degrees(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    #[must_use]
    pub fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lng(self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"`, the same shape [`Coordinate`] displays as.
impl FromStr for Coordinate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidCoordinate {
            lat: f64::NAN,
            lng: f64::NAN,
        };
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(lat, lng)
    }
}

/// Haversine great-circle distance in kilometres.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `h` just past 1 for antipodal pairs.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Human-readable distance: whole metres below one kilometre, otherwise
/// kilometres with one decimal place.
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        // Bounded by 1000 here, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        let metres = (km * 1000.0).round() as i64;
        format!("{metres} m")
    } else {
        format!("{km:.1} km")
    }
}

/// Turn-by-turn map apps that [`directions_url`] can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionsProvider {
    #[default]
    Google,
    Apple,
}

impl fmt::Display for DirectionsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionsProvider::Google => write!(f, "google"),
            DirectionsProvider::Apple => write!(f, "apple"),
        }
    }
}

impl FromStr for DirectionsProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(DirectionsProvider::Google),
            "apple" => Ok(DirectionsProvider::Apple),
            other => Err(CoreError::UnknownProvider(other.to_string())),
        }
    }
}

/// Driving-directions deep link from `origin` to `dest`.
#[must_use]
pub fn directions_url(origin: Coordinate, dest: Coordinate, provider: DirectionsProvider) -> String {
    match provider {
        DirectionsProvider::Google => format!(
            "https://www.google.com/maps/dir/{},{}/{},{}",
            origin.lat, origin.lng, dest.lat, dest.lng
        ),
        DirectionsProvider::Apple => format!(
            "maps://maps.apple.com/?saddr={},{}&daddr={},{}&dirflg=d",
            origin.lat, origin.lng, dest.lat, dest.lng
        ),
    }
}

/// Map search link for `dest`, for when there is no origin to route from.
#[must_use]
pub fn search_url(dest: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        dest.lat, dest.lng
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).expect("valid test coordinate")
    }

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = coord(12.9716, 77.5946);
        assert!(distance_km(p, p).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (coord(12.9816, 77.5946), coord(12.9352, 77.6245)),
            (coord(-33.8688, 151.2093), coord(51.5074, -0.1278)),
            (coord(89.9, 179.9), coord(-89.9, -179.9)),
        ];
        for (a, b) in pairs {
            let ab = distance_km(a, b);
            let ba = distance_km(b, a);
            assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
        }
    }

    #[test]
    fn distance_matches_known_city_pair() {
        // Bengaluru → Chennai is roughly 290 km as the crow flies.
        let blr = coord(12.9716, 77.5946);
        let maa = coord(13.0827, 80.2707);
        let d = distance_km(blr, maa);
        assert!((280.0..300.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_grows_with_separation() {
        let origin = coord(0.0, 0.0);
        let near = distance_km(origin, coord(0.0, 1.0));
        let far = distance_km(origin, coord(0.0, 2.0));
        let farther = distance_km(origin, coord(0.0, 90.0));
        assert!(near < far && far < farther);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let d = distance_km(coord(0.0, 0.0), coord(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn near_antipodal_pairs_stay_finite() {
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        for step in -900..=900 {
            let lat = f64::from(step) / 10.0;
            let d = distance_km(coord(lat, 0.0), coord(-lat, 180.0));
            assert!(d.is_finite(), "lat {lat} gave {d}");
            assert!((d - half).abs() < 0.01, "lat {lat} gave {d}");
            assert!(!format_distance(d).contains("NaN"));
        }
    }

    #[test]
    fn format_distance_below_one_km_uses_metres() {
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(0.1234), "123 m");
    }

    #[test]
    fn format_distance_from_one_km_uses_one_decimal() {
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(12.34), "12.3 km");
        assert_eq!(format_distance(250.0), "250.0 km");
    }

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn coordinate_parses_lat_lng_pair() {
        let c: Coordinate = "12.9716, 77.5946".parse().unwrap();
        assert_eq!(c, coord(12.9716, 77.5946));
        assert!("12.9716".parse::<Coordinate>().is_err());
        assert!("abc,77".parse::<Coordinate>().is_err());
        assert!("95,77".parse::<Coordinate>().is_err());
    }

    #[test]
    fn coordinate_deserialization_validates_range() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 12.5, "lng": 77.5}"#).unwrap();
        assert_eq!(ok, coord(12.5, 77.5));
        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 120.0, "lng": 77.5}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn google_directions_url() {
        let url = directions_url(
            coord(12.9716, 77.5946),
            coord(12.9352, 77.6245),
            DirectionsProvider::Google,
        );
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/12.9716,77.5946/12.9352,77.6245"
        );
    }

    #[test]
    fn apple_directions_url() {
        let url = directions_url(
            coord(12.9716, 77.5946),
            coord(12.9352, 77.6245),
            DirectionsProvider::Apple,
        );
        assert_eq!(
            url,
            "maps://maps.apple.com/?saddr=12.9716,77.5946&daddr=12.9352,77.6245&dirflg=d"
        );
    }

    #[test]
    fn search_url_targets_destination() {
        assert_eq!(
            search_url(coord(12.9352, 77.6245)),
            "https://www.google.com/maps/search/?api=1&query=12.9352,77.6245"
        );
    }

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!(
            "Apple".parse::<DirectionsProvider>().unwrap(),
            DirectionsProvider::Apple
        );
        assert!(matches!(
            "waze".parse::<DirectionsProvider>(),
            Err(CoreError::UnknownProvider(ref p)) if p == "waze"
        ));
    }

    #[test]
    fn default_center_is_in_range() {
        assert!(Coordinate::new(DEFAULT_CENTER.lat(), DEFAULT_CENTER.lng()).is_ok());
    }
}
