//! Facility ranking and navigation commands.

use std::time::Duration;

use clap::Args;
use grainguard_core::{
    builtin_catalog, load_catalog, rank, AppConfig, Coordinate, DirectionsProvider, Facility,
    FacilityFilter, MapToken, NearbyFacilities, PreferenceStore, RankedFacility,
};
use grainguard_location::{LocationProvider, StaticDevice};
use grainguard_map::{HeadlessEngine, MapView};

/// Arguments for `nearby`.
#[derive(Debug, Default, Args)]
pub struct NearbyArgs {
    /// Your latitude; without a position, distances are measured from the city center
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Your longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
    /// Only facilities whose name contains this text
    #[arg(long)]
    pub query: Option<String>,
    /// Only facilities that accept this grain (e.g. Wheat)
    #[arg(long)]
    pub grain: Option<String>,
    /// Print the ranking as JSON
    #[arg(long)]
    pub json: bool,
    /// Also summarise what the facility map would show
    #[arg(long)]
    pub map: bool,
}

/// The configured YAML catalog, or the built-in facilities.
fn load_facilities(config: &AppConfig) -> anyhow::Result<Vec<Facility>> {
    match &config.catalog_path {
        Some(path) => Ok(load_catalog(path)?),
        None => Ok(builtin_catalog()),
    }
}

/// Rank facilities from the given position.
///
/// Without `--lat/--lng` there is no location source, so the location error
/// is reported and distances fall back to the default center.
///
/// # Errors
///
/// Returns an error if the catalog or preferences cannot be loaded, or the
/// position is out of range.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    store: &PreferenceStore,
    args: &NearbyArgs,
) -> anyhow::Result<()> {
    let mut nearby = NearbyFacilities::new(load_facilities(config)?);
    nearby.set_filter(FacilityFilter {
        name_query: args.query.clone(),
        grain: args.grain.clone(),
    });

    let device = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => StaticDevice::fixed(Coordinate::new(lat, lng)?, 0.0),
        _ => StaticDevice::unsupported(),
    };
    let provider = LocationProvider::with_timeout(
        device,
        Duration::from_secs(config.location_timeout_secs),
    );
    nearby.apply(provider.get_once().await);

    if let Some(message) = nearby.error_message() {
        eprintln!(
            "{message} Showing distances from {}.",
            nearby.reference()
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(nearby.ranking())?);
    } else {
        print_ranking(nearby.ranking());
    }

    if args.map {
        let prefs = store.load()?;
        let token = prefs.map_token().map(MapToken::as_str);
        print_map_summary(token, &nearby)?;
    }

    Ok(())
}

fn print_ranking(ranking: &[RankedFacility]) {
    if ranking.is_empty() {
        println!("no facilities match the current filter");
        return;
    }

    println!(
        "{:<6}{:<26}{:>10}{:>8}{:>11}{:>10}  GRAINS",
        "ID", "NAME", "DISTANCE", "RATING", "PRICE/KG", "CAPACITY"
    );
    for ranked in ranking {
        let f = &ranked.facility;
        let grains = f
            .accepted_grains
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let price = format!("\u{20b9}{}", f.price_per_kg_month);
        let capacity = format!("{} kg", f.capacity_kg);
        println!(
            "{:<6}{:<26}{:>10}{:>8.1}{price:>11}{capacity:>10}  {grains}",
            f.id, f.name, ranked.distance_label, f.rating_stars,
        );
    }
}

fn print_map_summary(token: Option<&str>, nearby: &NearbyFacilities) -> anyhow::Result<()> {
    let mut map = MapView::new(token, |_, _| Ok(HeadlessEngine::new()));
    map.refresh(nearby.ranking(), nearby.reference())?;
    if let Some(sample) = nearby.latest_sample() {
        map.set_user_position(sample.coordinate)?;
    }

    println!();
    let Some(engine) = map.engine() else {
        println!("map unavailable: save a public token with `grainguard token set pk...`");
        return Ok(());
    };

    println!("map: {} markers", engine.marker_count());
    if let Some((bounds, options)) = engine.last_fit() {
        let (south, west) = bounds.south_west();
        let (north, east) = bounds.north_east();
        println!(
            "viewport: {south:.4},{west:.4} to {north:.4},{east:.4} (padding {}px, max zoom {})",
            options.padding, options.max_zoom
        );
    }
    Ok(())
}

/// Print a navigation link to `facility_id`: turn-by-turn from `from` when
/// given, otherwise a map search for the facility.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the id is unknown.
pub(crate) fn run_directions(
    config: &AppConfig,
    facility_id: &str,
    from: Option<Coordinate>,
    provider: DirectionsProvider,
) -> anyhow::Result<()> {
    let catalog = load_facilities(config)?;
    let reference = from.unwrap_or(grainguard_core::DEFAULT_CENTER);

    let mut map: MapView<HeadlessEngine> = MapView::uninitialized();
    map.refresh(&rank(&catalog, reference), reference)?;
    if let Some(origin) = from {
        map.set_user_position(origin)?;
    }
    map.select(facility_id)?;

    let name = map
        .selected_facility()
        .map(|f| f.facility.name.clone())
        .unwrap_or_default();
    if let Some(url) = map.directions_for_selected(provider)? {
        println!("{name}: {url}");
    }
    Ok(())
}
