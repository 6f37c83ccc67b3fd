use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "intelwatch-agent",
    about = "Threat-intelligence aggregation agent",
    version
)]
pub struct Cli {
    /// Path to the YAML config file. Missing file means defaults plus
    /// environment credentials.
    #[arg(short, long, default_value = "intelwatch.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a single ingestion cycle and exit.
    Once,
    /// Print version information.
    Version,
}

pub fn parse() -> Cli {
    Cli::parse()
}
