//! Command-line interface.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-chain round-trip arbitrage scanner (paper mode)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Scan every network until interrupted (default)
    Scan {
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },
    /// Check RPC connectivity and latest block of every network
    Probe,
    /// Print the validated network table
    Networks,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Scan { once: false })
    }
}
