//! Main Entrypoint for the Claire Assistant
//!
//! 1. Parses command-line arguments.
//! 2. Loads configuration (bootstrapping it from the example if needed).
//! 3. Initializes logging.
//! 4. Builds the assistant and runs a single turn or the terminal loop.

use anyhow::Context;
use claire_core::{AppConfig, Assistant};
use claire_service::{cli::Args, logging, terminal::TerminalUi};
use clap::Parser;
use std::io;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // --- 1. Load Configuration ---
    let config = AppConfig::load(&args.config).context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    logging::init(&config.logging).context("Failed to initialize logging")?;
    info!(config = %args.config.display(), "Starting Claire...");

    // --- 3. Initialize Assistant ---
    let mut assistant = Assistant::from_config(&config);

    // --- 4. Run Front-end ---
    match args.message {
        Some(message) => println!("{}", assistant.process(&message)),
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            TerminalUi::new(&mut assistant).run(stdin.lock(), &mut stdout)?;
        }
    }

    info!("Claire has shut down.");
    Ok(())
}
