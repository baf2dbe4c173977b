//! Configuration handling for Splitpath
//!
//! Parses and validates splitpath.toml configuration files. All
//! pattern and bucket errors surface here, at load time; partitioning
//! never fails on configuration.

mod schema;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matcher::{BucketRule, ConfigError, PathMatcher, Pattern};

pub use schema::{BucketConfig, OneOrMany, PatternSource};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bucket declarations, in priority order
    #[serde(default)]
    pub buckets: Vec<BucketConfig>,

    /// Pattern(s) exempted from bucketing entirely
    #[serde(default)]
    pub ignore: OneOrMany<PatternSource>,

    /// Chunk names never scanned for bucketing
    #[serde(default)]
    pub ignore_chunks: OneOrMany<String>,

    /// Name of the manifest chunk loaded ahead of everything, if any
    #[serde(default)]
    pub manifest: Option<String>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse splitpath.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.buckets.is_empty() {
            anyhow::bail!("At least one bucket must be specified in splitpath.toml");
        }

        // compiling the matcher checks patterns and bucket names
        self.matcher()
            .with_context(|| "Invalid bucket or ignore configuration")?;

        Ok(())
    }

    /// Compile the configured rules into a matcher
    pub fn matcher(&self) -> Result<PathMatcher, ConfigError> {
        let ignore = self
            .ignore
            .items()
            .iter()
            .map(|source| compile(source, "ignore"))
            .collect::<Result<Vec<_>, _>>()?;

        let buckets = self
            .buckets
            .iter()
            .map(|bucket| {
                let patterns = bucket
                    .path
                    .items()
                    .iter()
                    .map(|source| compile(source, &bucket.name))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(BucketRule::new(bucket.name.clone(), patterns))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        PathMatcher::new(ignore, buckets)
    }

    /// Chunk names excluded from partitioning
    pub fn ignore_chunk_names(&self) -> Vec<String> {
        self.ignore_chunks.items().to_vec()
    }
}

fn compile(source: &PatternSource, context: &str) -> Result<Pattern, ConfigError> {
    match source {
        PatternSource::Prefix(prefix) => Pattern::literal(prefix, context),
        PatternSource::Regex { regex } => Pattern::regex(regex, context),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
manifest = "manifest"
ignore = "./src/generated"
ignore_chunks = ["polyfills"]

[[buckets]]
name = "vendor"
path = "node_modules"

[[buckets]]
name = "styles"
path = [{ regex = '\./css/' }, "./styles"]
"#;

    #[test]
    fn test_parse_and_compile() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.buckets.len(), 2);
        assert_eq!(config.manifest.as_deref(), Some("manifest"));
        assert_eq!(config.ignore_chunk_names(), vec!["polyfills".to_string()]);

        let matcher = config.matcher().unwrap();
        assert_eq!(matcher.classify(Some("node_modules/react/index.js")), Some(0));
        assert_eq!(matcher.classify(Some("./css/app.css")), Some(1));
        assert_eq!(matcher.classify(Some("./styles/theme.css")), Some(1));
        assert_eq!(matcher.classify(Some("./src/generated/api.js")), None);
    }

    #[test]
    fn test_scalar_ignore_chunks() {
        let config: Config = toml::from_str(
            r#"
ignore_chunks = "polyfills"

[[buckets]]
name = "vendor"
path = "node_modules"
"#,
        )
        .unwrap();
        assert_eq!(config.ignore_chunk_names(), vec!["polyfills".to_string()]);
    }

    #[test]
    fn test_duplicate_bucket_name_rejected() {
        let config: Config = toml::from_str(
            r#"
[[buckets]]
name = "vendor"
path = "node_modules"

[[buckets]]
name = "vendor"
path = "./lib"
"#,
        )
        .unwrap();
        assert!(config.matcher().is_err());
    }

    #[test]
    fn test_malformed_pattern_rejected_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[buckets]]
name = "vendor"
path = {{ regex = "(unclosed" }}
"#
        )
        .unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_no_buckets_rejected_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "manifest = \"manifest\"\n").unwrap();

        assert!(Config::load(file.path()).is_err());
    }
}
