use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::facilities::Facility;
use crate::geo::Coordinate;
use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub facilities: Vec<Facility>,
}

/// Load and validate a facility catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Vec<Facility>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<Vec<Facility>, ConfigError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(&catalog.facilities)?;
    Ok(catalog.facilities)
}

fn validate_catalog(facilities: &[Facility]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for facility in facilities {
        if facility.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "facility '{}' has an empty id",
                facility.name
            )));
        }

        if facility.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "facility '{}' has an empty name",
                facility.id
            )));
        }

        if !seen_ids.insert(facility.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate facility id: '{}'",
                facility.id
            )));
        }

        if !(0.0..=5.0).contains(&facility.rating_stars) {
            return Err(ConfigError::Validation(format!(
                "facility '{}' has rating {}; must be between 0 and 5",
                facility.id, facility.rating_stars
            )));
        }

        if facility.price_per_kg_month.is_sign_negative() {
            return Err(ConfigError::Validation(format!(
                "facility '{}' has negative price {}",
                facility.id, facility.price_per_kg_month
            )));
        }
    }

    Ok(())
}

/// The Bengaluru facilities the app ships with.
#[must_use]
pub fn builtin_catalog() -> Vec<Facility> {
    let entry = |id: &str,
                 name: &str,
                 coordinate: Coordinate,
                 rating_stars: f64,
                 capacity_kg: u64,
                 price: i64,
                 grains: &[&str]| Facility {
        id: id.to_string(),
        name: name.to_string(),
        coordinate,
        rating_stars,
        capacity_kg,
        price_per_kg_month: Decimal::from(price),
        accepted_grains: grains.iter().map(|g| (*g).to_string()).collect::<BTreeSet<_>>(),
    };

    vec![
        entry(
            "1",
            "Bengaluru Cold Storage",
            Coordinate::from_degrees(12.981_6, 77.594_6),
            4.8,
            5000,
            12,
            &["Wheat", "Rice"],
        ),
        entry(
            "2",
            "AgriCool Warehouse",
            Coordinate::from_degrees(12.935_2, 77.624_5),
            4.5,
            8000,
            10,
            &["Maize", "Pulses"],
        ),
        entry(
            "3",
            "FarmStore Hub",
            Coordinate::from_degrees(13.035_8, 77.597_0),
            4.7,
            3500,
            15,
            &["Wheat", "Barley"],
        ),
        entry(
            "4",
            "KrishiCold Center",
            Coordinate::from_degrees(12.906_3, 77.585_7),
            4.6,
            6000,
            11,
            &["Rice", "Millet"],
        ),
        entry(
            "5",
            "GreenGrain Storage",
            Coordinate::from_degrees(13.045_0, 77.660_0),
            4.4,
            4500,
            13,
            &["Wheat", "Maize"],
        ),
    ]
}
