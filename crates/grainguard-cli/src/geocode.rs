//! Place lookup commands.

use clap::Subcommand;
use grainguard_core::{AppConfig, Coordinate, MapToken, PreferenceStore};
use grainguard_geocode::GeocodingClient;

/// Sub-commands available under `geocode`.
#[derive(Debug, Subcommand)]
pub enum GeocodeCommands {
    /// Find places matching a name or address
    Search {
        /// Free-text place name or address
        query: String,
        /// Prefer results near LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        near: Option<Coordinate>,
    },
    /// Name the place at a coordinate
    Reverse {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },
}

/// Run a geocoding sub-command with the saved map token.
///
/// Lookups never fail: without a usable token, or when the provider
/// rejects it, the output is simply empty or "Unknown location".
///
/// # Errors
///
/// Returns an error if preferences cannot be loaded, the HTTP client cannot
/// be built, or a coordinate argument is out of range.
pub(crate) async fn run_geocode(
    config: &AppConfig,
    store: &PreferenceStore,
    command: GeocodeCommands,
) -> anyhow::Result<()> {
    let prefs = store.load()?;
    let token = prefs.map_token().map_or("", MapToken::as_str);
    if token.is_empty() {
        eprintln!("no map token saved; run `grainguard token set pk...` for real results");
    }
    let client = GeocodingClient::from_config(config)?;

    match command {
        GeocodeCommands::Search { query, near } => {
            let hits = client.forward_geocode(&query, token, near).await;
            if hits.is_empty() {
                println!("no places found for '{query}'");
                return Ok(());
            }
            for hit in &hits {
                println!(
                    "{:>9.4},{:<10.4} {}",
                    hit.coordinate.lat(),
                    hit.coordinate.lng(),
                    hit.label
                );
            }
        }
        GeocodeCommands::Reverse { lat, lng } => {
            let coordinate = Coordinate::new(lat, lng)?;
            println!("{}", client.reverse_geocode(coordinate, token).await);
        }
    }

    Ok(())
}
