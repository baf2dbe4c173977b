//! Check command implementation

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::Config;

/// Validate the configuration and print the compiled rules
#[derive(Args, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    pub fn execute(&self, config_path: &str) -> Result<()> {
        let config = Config::load(config_path)?;
        let matcher = config.matcher()?;

        eprintln!("{} {} is valid\n", "✓".green().bold(), config_path.cyan());

        for bucket in matcher.buckets() {
            eprintln!(
                "  {} {} {} pattern(s)",
                "•".dimmed(),
                bucket.name.cyan(),
                bucket.patterns.len()
            );
        }

        if let Some(manifest) = &config.manifest {
            eprintln!("  {} manifest chunk: {}", "•".dimmed(), manifest.cyan());
        }

        let ignored = config.ignore_chunk_names();
        if !ignored.is_empty() {
            eprintln!(
                "  {} ignored chunks: {}",
                "•".dimmed(),
                ignored.join(", ").dimmed()
            );
        }

        eprintln!();
        Ok(())
    }
}
