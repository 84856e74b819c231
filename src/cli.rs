//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "choreboard",
    version,
    about = "Household task backend with deadline tracking and performance scoring"
)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the database path
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Override the HTTP port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server and the deadline sweeper (default)
    Serve,
    /// Run a single sweep pass and exit
    Sweep,
    /// Print the performance ranking for a household
    Rank {
        /// Household ID to rank
        #[arg(long)]
        household: String,
    },
    /// Populate a household with generated sample task history
    Seed {
        /// Household ID to seed
        #[arg(long)]
        household: String,
        /// Weeks of history to generate
        #[arg(long, default_value_t = 6)]
        weeks: u32,
    },
}
