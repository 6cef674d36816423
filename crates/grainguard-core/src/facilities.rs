use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A cold-storage site that can be rented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    /// Average review score, 0–5.
    pub rating_stars: f64,
    pub capacity_kg: u64,
    /// Rupees per kilogram per month.
    pub price_per_kg_month: Decimal,
    #[serde(default)]
    pub accepted_grains: BTreeSet<String>,
}

impl Facility {
    /// Case-insensitive membership test against [`Facility::accepted_grains`].
    #[must_use]
    pub fn accepts_grain(&self, grain: &str) -> bool {
        let wanted = grain.trim();
        self.accepted_grains
            .iter()
            .any(|g| g.eq_ignore_ascii_case(wanted))
    }
}

/// A [`Facility`] annotated with its distance from the current reference
/// coordinate. Derived on every ranking pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFacility {
    pub facility: Facility,
    pub distance_km: f64,
    pub distance_label: String,
}
