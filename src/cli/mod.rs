pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "parcel")]
#[command(about = "Parcel CLI - offline administration for the parcel database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Replace the database contents from a spreadsheet export (destructive)")]
    Import(commands::import::ImportArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Import(args) => commands::import::handle(args).await,
    }
}
