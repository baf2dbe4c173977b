//! Command-line interface for Splitpath
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `split`: partition a graph description
//! - `check`: validate a configuration file

mod check;
mod split;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

pub use check::CheckCommand;
pub use split::SplitCommand;

/// Splitpath - path-based chunk partitioning for module bundlers
#[derive(Parser, Debug)]
#[command(name = "splitpath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to splitpath.toml config file
    #[arg(short, long, global = true, default_value = "splitpath.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Partition a chunk graph into bucket chunks
    Split(SplitCommand),

    /// Validate the configuration and print the compiled rules
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Split(cmd) => cmd.execute(&self.config),
            Commands::Check(cmd) => cmd.execute(&self.config),
        }
    }
}

/// Print the Splitpath banner
fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "◇".cyan(),
        "Splitpath".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
