//! Splitpath library
//!
//! Partitions a build's chunk graph into named bucket chunks by
//! path-pattern classification.

pub mod cli;
pub mod config;
pub mod graph;
pub mod matcher;
pub mod partition;

pub use cli::Cli;
pub use config::Config;
pub use graph::ChunkGraph;
pub use matcher::{BucketRule, ConfigError, PathMatcher, Pattern};
pub use partition::{PartitionPass, Partitioner};
