#![forbid(unsafe_code)]

mod cli;
mod startup;

use anyhow::Result;

use cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();

    match cli.command {
        Some(Command::Version) => {
            println!("intelwatch-agent {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Command::Once) => startup::run_once(&cli).await,
        None => startup::run(&cli).await,
    }
}
