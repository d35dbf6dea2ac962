//! Listing Importer CLI
//!
//! Local exerciser for the import pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use listing_importer::{config::load_config, error::Result, ListingImporter};

/// Listing Importer - rental listing to property draft
#[derive(Parser, Debug)]
#[command(
    name = "listing-import",
    version,
    about = "Import a rental listing into a normalized property draft"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a listing and print the draft as JSON
    Import {
        /// Listing URL, e.g. https://www.airbnb.com.br/rooms/123456
        url: String,

        /// Write the draft to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the number of photos kept
        #[arg(long)]
        photo_cap: Option<usize>,
    },

    /// Check whether the remote scraper is online
    Status,

    /// Validate the configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, "info");
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
    };
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Command::Import {
            url,
            output,
            photo_cap,
        } => {
            if let Some(cap) = photo_cap {
                config.import.photo_cap = cap;
            }
            let importer = ListingImporter::from_config(&config)?;

            let result = importer
                .import_with_progress(&url, |progress| {
                    log::info!(
                        "[{}/{}] {}",
                        progress.step,
                        progress.total,
                        progress.message
                    );
                })
                .await;

            let draft = match result {
                Ok(draft) => draft,
                Err(e) => {
                    log::error!("{}", e.user_message(importer.messages()));
                    return Err(e);
                }
            };

            let json = serde_json::to_string_pretty(&draft)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("Draft saved to {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Status => {
            let importer = ListingImporter::from_config(&config)?;
            let status = importer.check_remote_status().await;
            if status.online {
                log::info!("Scraper online (HTTP {}): {}", status.status, status.message);
            } else {
                log::warn!("Scraper offline (HTTP {}): {}", status.status, status.message);
            }
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("✓ Config OK (scraper endpoint {})", config.scraper.scrape_endpoint());
        }
    }

    Ok(())
}
