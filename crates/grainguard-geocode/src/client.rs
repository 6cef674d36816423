//! HTTP client for the places geocoding API.
//!
//! Every request carries the user's public map token as `access_token`. The
//! token is checked locally with [`MapToken::parse`] first, and a token that
//! fails that check never reaches the network.

use std::time::Duration;

use grainguard_core::{AppConfig, Coordinate, MapToken};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::{FeatureCollection, GeocodeHit};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";
const DEFAULT_DATASET: &str = "mapbox";
const DEFAULT_COUNTRY: &str = "in";
const REVERSE_TYPES: &str = "address,place";

/// Label returned by [`GeocodingClient::reverse_geocode`] when no place name
/// could be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Client for forward and reverse place lookups.
///
/// Use [`GeocodingClient::new`] for the public endpoint,
/// [`GeocodingClient::from_config`] to honour the environment overrides, or
/// [`GeocodingClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodingClient {
    client: Client,
    base_url: Url,
    dataset: String,
    country: String,
}

impl GeocodingClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("grainguard/0.1 (facility-finder)")
            .build()?;

        // Exactly one trailing slash, so `Url::join` appends below the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            dataset: DEFAULT_DATASET.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        })
    }

    /// Builds a client from the `GRAINGUARD_GEOCODING_*` settings.
    ///
    /// # Errors
    ///
    /// Same as [`GeocodingClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Ok(
            Self::with_base_url(config.geocoding_timeout_secs, &config.geocoding_base_url)?
                .with_dataset(&config.geocoding_dataset)
                .with_country(&config.geocoding_country),
        )
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: &str) -> Self {
        self.dataset = dataset.to_string();
        self
    }

    /// ISO 3166 alpha-2 filter applied to forward searches.
    #[must_use]
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    /// Human-readable place name for `coordinate`.
    ///
    /// Never fails: a malformed token, a transport or status error, an
    /// unparseable body, and an empty result all yield [`UNKNOWN_LOCATION`].
    pub async fn reverse_geocode(&self, coordinate: Coordinate, token: &str) -> String {
        match self.try_reverse_geocode(coordinate, token).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                tracing::debug!(%coordinate, "reverse geocode returned no features");
                UNKNOWN_LOCATION.to_string()
            }
            Err(e) => {
                tracing::warn!(%coordinate, error = %e, "reverse geocode failed");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    /// Places matching `query`, optionally biased toward `proximity`.
    ///
    /// Never fails: any error yields an empty list. Features without a usable
    /// `[lng, lat]` center are skipped.
    pub async fn forward_geocode(
        &self,
        query: &str,
        token: &str,
        proximity: Option<Coordinate>,
    ) -> Vec<GeocodeHit> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.try_forward_geocode(query, token, proximity).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(query, error = %e, "forward geocode failed");
                Vec::new()
            }
        }
    }

    async fn try_reverse_geocode(
        &self,
        coordinate: Coordinate,
        token: &str,
    ) -> Result<Option<String>, GeocodeError> {
        let token = MapToken::parse(token)?;
        let url = self.reverse_url(coordinate, &token)?;
        let collection = self.fetch_features(&url).await?;
        Ok(collection
            .features
            .into_iter()
            .next()
            .and_then(|f| f.place_name))
    }

    async fn try_forward_geocode(
        &self,
        query: &str,
        token: &str,
        proximity: Option<Coordinate>,
    ) -> Result<Vec<GeocodeHit>, GeocodeError> {
        let token = MapToken::parse(token)?;
        let url = self.forward_url(query, &token, proximity)?;
        let collection = self.fetch_features(&url).await?;

        let hits = collection
            .features
            .into_iter()
            .filter_map(|feature| {
                let coordinate = feature.coordinate()?;
                let label = feature
                    .place_name
                    .unwrap_or_else(|| coordinate.to_string());
                Some(GeocodeHit { coordinate, label })
            })
            .collect::<Vec<_>>();
        tracing::debug!(query, hits = hits.len(), "forward geocode complete");
        Ok(hits)
    }

    fn reverse_url(&self, coordinate: Coordinate, token: &MapToken) -> Result<Url, GeocodeError> {
        let segment = format!("{},{}", coordinate.lng(), coordinate.lat());
        let mut url = self.places_url(&segment)?;
        url.query_pairs_mut()
            .append_pair("access_token", token.as_str())
            .append_pair("types", REVERSE_TYPES);
        Ok(url)
    }

    fn forward_url(
        &self,
        query: &str,
        token: &MapToken,
        proximity: Option<Coordinate>,
    ) -> Result<Url, GeocodeError> {
        let segment = utf8_percent_encode(query.trim(), NON_ALPHANUMERIC).to_string();
        let mut url = self.places_url(&segment)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", token.as_str());
            pairs.append_pair("country", &self.country);
            if let Some(bias) = proximity {
                pairs.append_pair("proximity", &format!("{},{}", bias.lng(), bias.lat()));
            }
        }
        Ok(url)
    }

    fn places_url(&self, segment: &str) -> Result<Url, GeocodeError> {
        let relative = format!("geocoding/v5/{}.places/{segment}.json", self.dataset);
        self.base_url
            .join(&relative)
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body as a
    /// feature collection.
    async fn fetch_features(&self, url: &Url) -> Result<FeatureCollection, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base: &str) -> GeocodingClient {
        GeocodingClient::with_base_url(5, base).expect("client construction should not fail")
    }

    fn token() -> MapToken {
        MapToken::parse("pk.test-token").unwrap()
    }

    #[test]
    fn reverse_url_puts_longitude_first() {
        let client = test_client("https://api.mapbox.com");
        let coord = Coordinate::new(12.9716, 77.5946).unwrap();
        let url = client.reverse_url(coord, &token()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/77.5946,12.9716.json\
             ?access_token=pk.test-token&types=address%2Cplace"
        );
    }

    #[test]
    fn forward_url_encodes_query_as_single_segment() {
        let client = test_client("https://api.mapbox.com/");
        let url = client
            .forward_url("MG Road/Bengaluru", &token(), None)
            .unwrap();
        assert!(
            url.path().ends_with("/MG%20Road%2FBengaluru.json"),
            "query should stay one path segment: {url}"
        );
        assert_eq!(url.query(), Some("access_token=pk.test-token&country=in"));
    }

    #[test]
    fn forward_url_adds_proximity_bias() {
        let client = test_client("https://api.mapbox.com").with_country("np");
        let bias = Coordinate::new(12.5, 77.25).unwrap();
        let url = client.forward_url("mandi", &token(), Some(bias)).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("country".into(), "np".into())));
        assert!(pairs.contains(&("proximity".into(), "77.25,12.5".into())));
    }

    #[test]
    fn base_url_with_path_prefix_is_kept() {
        let client = test_client("http://localhost:9000/proxy").with_dataset("mapbox.test");
        let coord = Coordinate::new(1.0, 2.0).unwrap();
        let url = client.reverse_url(coord, &token()).unwrap();
        assert_eq!(
            url.path(),
            "/proxy/geocoding/v5/mapbox.test.places/2,1.json"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            GeocodingClient::with_base_url(5, "not a url"),
            Err(GeocodeError::InvalidBaseUrl { .. })
        ));
    }
}
