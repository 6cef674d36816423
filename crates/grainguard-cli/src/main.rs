mod dial;
mod geocode;
mod nearby;
mod plans;
mod prefs;

use clap::{Parser, Subcommand};
use grainguard_core::{Coordinate, DirectionsProvider, PreferenceStore};
use tracing_subscriber::EnvFilter;

use crate::geocode::GeocodeCommands;
use crate::nearby::NearbyArgs;
use crate::prefs::{LanguageCommands, TokenCommands};

#[derive(Debug, Parser)]
#[command(name = "grainguard")]
#[command(about = "Find cold storage for your grain near you")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank storage facilities by distance (the default command)
    Nearby(NearbyArgs),
    /// Look up places by name or coordinate
    Geocode {
        #[command(subcommand)]
        command: GeocodeCommands,
    },
    /// Manage the public map token
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Manage the display language
    Language {
        #[command(subcommand)]
        command: LanguageCommands,
    },
    /// Print a navigation link to a facility
    Directions {
        /// Facility id, as shown by `nearby`
        facility_id: String,
        /// Starting point as LAT,LNG; without it a map search link is printed
        #[arg(long, allow_hyphen_values = true)]
        from: Option<Coordinate>,
        /// Navigation app to target
        #[arg(long, default_value_t = DirectionsProvider::Google)]
        provider: DirectionsProvider,
    },
    /// List subscription plans with GST
    Plans,
    /// Show the temperature dial for a setpoint
    Dial {
        /// Setpoint in whole degrees Celsius
        #[arg(allow_hyphen_values = true)]
        celsius: i32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = grainguard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, prefs = %config.prefs_path.display(), "configuration loaded");

    let store = PreferenceStore::new(config.prefs_path.clone());
    let cli = Cli::parse();

    match cli.command {
        None => nearby::run_nearby(&config, &store, &NearbyArgs::default()).await?,
        Some(Commands::Nearby(args)) => nearby::run_nearby(&config, &store, &args).await?,
        Some(Commands::Geocode { command }) => {
            geocode::run_geocode(&config, &store, command).await?;
        }
        Some(Commands::Token { command }) => prefs::run_token(&store, command)?,
        Some(Commands::Language { command }) => prefs::run_language(&store, command)?,
        Some(Commands::Directions {
            facility_id,
            from,
            provider,
        }) => nearby::run_directions(&config, &facility_id, from, provider)?,
        Some(Commands::Plans) => plans::run_plans(),
        Some(Commands::Dial { celsius }) => dial::run_dial(celsius),
    }

    Ok(())
}
