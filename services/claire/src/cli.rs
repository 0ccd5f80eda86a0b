use clap::Parser;
use std::path::PathBuf;

/// Claire, a personal voice/text assistant.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Process a single message, print the reply and exit.
    #[arg(short, long)]
    pub message: Option<String>,
}
