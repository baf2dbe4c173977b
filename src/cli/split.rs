//! Split command implementation

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::Config;
use crate::graph::io::GraphFile;
use crate::partition::{PartitionPass, Partitioner};

/// Partition a chunk graph into bucket chunks
#[derive(Args, Debug)]
pub struct SplitCommand {
    /// Path to the graph description (JSON)
    pub graph: PathBuf,

    /// Write the partitioned graph to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SplitCommand {
    pub fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        info!("Loading configuration from {}", config_path);
        let config = Config::load(config_path)?;
        let partitioner = Partitioner::from_config(&config)?;

        let content = fs::read_to_string(&self.graph)
            .with_context(|| format!("Failed to read graph file: {}", self.graph.display()))?;
        let file: GraphFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse graph file: {}", self.graph.display()))?;
        let mut graph = file.into_graph()?;

        eprintln!("{} Partitioning graph...", "→".blue());

        let mut pass = PartitionPass::new();
        partitioner.partition(&mut graph, &mut pass);

        let duration = start.elapsed();
        eprintln!(
            "\n{} Partitioned {} module(s) into {} chunk(s) in {:.2}ms\n",
            "✓".green().bold(),
            graph.module_count(),
            graph.chunk_count(),
            duration.as_secs_f64() * 1000.0
        );

        // entrypoint load orders
        for ep_id in graph.entrypoint_ids() {
            let Some(ep) = graph.entrypoint(ep_id) else {
                continue;
            };
            let order: Vec<String> = ep
                .chunks
                .iter()
                .filter_map(|&c| graph.chunk(c).and_then(|c| c.name.clone()))
                .collect();
            eprintln!(
                "  {} {} {}",
                "•".dimmed(),
                ep.name.cyan(),
                order.join(" → ").dimmed()
            );
        }

        // chunk membership summary
        eprintln!();
        for chunk_id in graph.chunk_ids() {
            let Some(chunk) = graph.chunk(chunk_id) else {
                continue;
            };
            let name = chunk.name.as_deref().unwrap_or("<unnamed>");
            let mut flags = Vec::new();
            if chunk.is_entry {
                flags.push("entry");
            }
            if chunk.is_initial {
                flags.push("initial");
            }
            eprintln!(
                "  {} {} {} module(s) {}",
                "•".dimmed(),
                name.cyan(),
                chunk.len(),
                format!("[{}]", flags.join(", ")).dimmed()
            );
        }
        eprintln!();

        if let Some(output) = &self.output {
            let out = GraphFile::from_graph(&graph);
            let json = serde_json::to_string_pretty(&out)?;
            fs::write(output, json)
                .with_context(|| format!("Failed to write graph file: {}", output.display()))?;
            eprintln!("{} Wrote {}\n", "✓".green().bold(), output.display());
        }

        Ok(())
    }
}
