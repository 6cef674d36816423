//! Distance ranking of the facility catalog.
//!
//! [`rank`] is the pure function; [`NearbyFacilities`] wraps it with the
//! latest-sample guard the list and map views share, so a late-arriving fix
//! can never overwrite a ranking computed from a newer one.

use crate::facilities::{Facility, RankedFacility};
use crate::geo::{distance_km, format_distance, Coordinate, DEFAULT_CENTER};
use crate::location::{LocationError, LocationSample};

/// Annotate every facility with its distance from `reference` and sort
/// ascending by distance.
///
/// The sort is stable: facilities at equal distance keep their input order.
#[must_use]
pub fn rank(facilities: &[Facility], reference: Coordinate) -> Vec<RankedFacility> {
    let mut ranked: Vec<RankedFacility> = facilities
        .iter()
        .map(|facility| {
            let distance = distance_km(reference, facility.coordinate);
            RankedFacility {
                facility: facility.clone(),
                distance_km: distance,
                distance_label: format_distance(distance),
            }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// [`rank`] against `reference`, or against [`DEFAULT_CENTER`] when no
/// position is known yet.
#[must_use]
pub fn rank_or_fallback(
    facilities: &[Facility],
    reference: Option<Coordinate>,
) -> Vec<RankedFacility> {
    rank(facilities, reference.unwrap_or(DEFAULT_CENTER))
}

/// Search-box and grain-chip filtering applied before ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityFilter {
    /// Case-insensitive substring of the facility name.
    pub name_query: Option<String>,
    /// Only facilities that accept this grain.
    pub grain: Option<String>,
}

impl FacilityFilter {
    #[must_use]
    pub fn matches(&self, facility: &Facility) -> bool {
        let name_ok = match self.name_query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => facility
                .name
                .to_lowercase()
                .contains(&query.to_lowercase()),
        };
        let grain_ok = match self.grain.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(grain) => facility.accepts_grain(grain),
        };
        name_ok && grain_ok
    }

    #[must_use]
    pub fn apply(&self, facilities: &[Facility]) -> Vec<Facility> {
        facilities
            .iter()
            .filter(|f| self.matches(f))
            .cloned()
            .collect()
    }
}

/// What [`NearbyFacilities::apply_sample`] did with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The sample became the reference and the ranking was recomputed.
    Accepted,
    /// The sample was not newer than the current one and was dropped.
    Stale,
}

/// The ranked facility list as the screens see it.
///
/// Starts out ranked against [`DEFAULT_CENTER`] so there is always a
/// deterministic, non-empty list. Location failures are recorded for
/// display but never clear the current ranking.
#[derive(Debug, Clone)]
pub struct NearbyFacilities {
    catalog: Vec<Facility>,
    filter: FacilityFilter,
    latest: Option<LocationSample>,
    last_error: Option<LocationError>,
    ranking: Vec<RankedFacility>,
}

impl NearbyFacilities {
    #[must_use]
    pub fn new(catalog: Vec<Facility>) -> Self {
        let mut nearby = Self {
            catalog,
            filter: FacilityFilter::default(),
            latest: None,
            last_error: None,
            ranking: Vec::new(),
        };
        nearby.recompute();
        nearby
    }

    /// The coordinate distances are currently measured from.
    #[must_use]
    pub fn reference(&self) -> Coordinate {
        self.latest.map_or(DEFAULT_CENTER, |s| s.coordinate)
    }

    #[must_use]
    pub fn latest_sample(&self) -> Option<&LocationSample> {
        self.latest.as_ref()
    }

    #[must_use]
    pub fn ranking(&self) -> &[RankedFacility] {
        &self.ranking
    }

    #[must_use]
    pub fn last_error(&self) -> Option<LocationError> {
        self.last_error
    }

    /// Inline message for the most recent location failure, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.last_error.map(LocationError::user_message)
    }

    #[must_use]
    pub fn filter(&self) -> &FacilityFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FacilityFilter) {
        self.filter = filter;
        self.recompute();
    }

    /// Adopt `sample` as the reference if it is newer than the current one.
    ///
    /// Ordering is by `captured_at`, not arrival order, so a slow one-shot
    /// request that resolves after a watch update is discarded.
    pub fn apply_sample(&mut self, sample: LocationSample) -> SampleOutcome {
        if let Some(current) = &self.latest {
            if sample.captured_at <= current.captured_at {
                tracing::debug!(
                    current = %current.captured_at,
                    incoming = %sample.captured_at,
                    "discarding out-of-order location sample"
                );
                return SampleOutcome::Stale;
            }
        }
        self.latest = Some(sample);
        self.last_error = None;
        self.recompute();
        SampleOutcome::Accepted
    }

    /// Record a failed location request. The current ranking is kept.
    pub fn apply_error(&mut self, error: LocationError) {
        tracing::warn!(error = %error, "location request failed; keeping last ranking");
        self.last_error = Some(error);
    }

    /// Route a provider result to [`Self::apply_sample`] or [`Self::apply_error`].
    pub fn apply(&mut self, result: Result<LocationSample, LocationError>) -> Option<SampleOutcome> {
        match result {
            Ok(sample) => Some(self.apply_sample(sample)),
            Err(error) => {
                self.apply_error(error);
                None
            }
        }
    }

    fn recompute(&mut self) {
        let visible = self.filter.apply(&self.catalog);
        self.ranking = rank(&visible, self.reference());
    }
}
