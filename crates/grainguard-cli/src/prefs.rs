//! Persisted preference commands.

use anyhow::Context;
use clap::Subcommand;
use grainguard_core::{Language, PreferenceStore};

/// Sub-commands available under `token`.
#[derive(Debug, Subcommand)]
pub enum TokenCommands {
    /// Save a public map token (must start with `pk.`)
    Set { token: String },
    /// Show the saved token, truncated
    Show,
    /// Forget the saved token
    Clear,
}

/// Sub-commands available under `language`.
#[derive(Debug, Subcommand)]
pub enum LanguageCommands {
    /// Switch the display language (en or kn)
    Set { language: Language },
    /// Show the current display language
    Show,
}

/// # Errors
///
/// Returns an error if the token is malformed (nothing is written) or the
/// preferences file cannot be read or written.
pub(crate) fn run_token(store: &PreferenceStore, command: TokenCommands) -> anyhow::Result<()> {
    let mut prefs = store.load()?;

    match command {
        TokenCommands::Set { token } => {
            prefs
                .set_map_token(token.trim())
                .context("token not saved")?;
            store.save(&prefs)?;
            if let Some(saved) = prefs.map_token() {
                println!("saved map token {}", saved.preview());
            }
        }
        TokenCommands::Show => match prefs.map_token() {
            Some(token) => println!("{}", token.preview()),
            None => println!("no map token saved"),
        },
        TokenCommands::Clear => {
            prefs.clear_map_token();
            store.save(&prefs)?;
            println!("map token removed");
        }
    }

    Ok(())
}

/// # Errors
///
/// Returns an error if the preferences file cannot be read or written.
pub(crate) fn run_language(
    store: &PreferenceStore,
    command: LanguageCommands,
) -> anyhow::Result<()> {
    let mut prefs = store.load()?;

    match command {
        LanguageCommands::Set { language } => {
            prefs.language = language;
            store.save(&prefs)?;
            println!("language set to {language}");
        }
        LanguageCommands::Show => println!("{}", prefs.language),
    }

    Ok(())
}
