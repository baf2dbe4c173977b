//! Path classification for bucket routing
//!
//! Classifies a module's resolved identifier against an ordered set of
//! ignore rules and an ordered set of bucket rules. Pure string/regex
//! matching, no filesystem access.

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling classification rules. All of these
/// surface at construction time; classification itself cannot fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pattern for {context}: {source}")]
    InvalidPattern {
        context: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate bucket name: {0}")]
    DuplicateBucket(String),

    #[error("bucket name must not be empty")]
    EmptyBucketName,
}

/// A compiled classification pattern, anchored to match a prefix of
/// the identifier
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a literal path prefix (escaped, anchored at the start)
    pub fn literal(prefix: &str, context: &str) -> Result<Self, ConfigError> {
        Self::compile(&regex::escape(prefix), context)
    }

    /// Compile a regular expression source (anchored at the start)
    pub fn regex(source: &str, context: &str) -> Result<Self, ConfigError> {
        Self::compile(source, context)
    }

    fn compile(source: &str, context: &str) -> Result<Self, ConfigError> {
        let regex =
            Regex::new(&format!("^(?:{source})")).map_err(|source| ConfigError::InvalidPattern {
                context: context.to_string(),
                source,
            })?;
        Ok(Self { regex })
    }

    /// Test the pattern against an already-normalized identifier
    pub fn matches(&self, request: &str) -> bool {
        self.regex.is_match(request)
    }
}

/// A named bucket rule: first bucket with any matching pattern wins
#[derive(Debug, Clone)]
pub struct BucketRule {
    pub name: String,
    pub patterns: Vec<Pattern>,
}

impl BucketRule {
    pub fn new(name: impl Into<String>, patterns: Vec<Pattern>) -> Self {
        Self {
            name: name.into(),
            patterns,
        }
    }
}

/// The path matcher: ordered ignore rules evaluated before ordered
/// bucket rules
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    ignore: Vec<Pattern>,
    buckets: Vec<BucketRule>,
}

impl PathMatcher {
    /// Create a matcher, validating bucket names once. Empty rule lists
    /// are allowed and behave as the trivial classifier.
    pub fn new(ignore: Vec<Pattern>, buckets: Vec<BucketRule>) -> Result<Self, ConfigError> {
        for (i, bucket) in buckets.iter().enumerate() {
            if bucket.name.is_empty() {
                return Err(ConfigError::EmptyBucketName);
            }
            if buckets[..i].iter().any(|b| b.name == bucket.name) {
                return Err(ConfigError::DuplicateBucket(bucket.name.clone()));
            }
        }

        Ok(Self { ignore, buckets })
    }

    /// The bucket rules, in declaration order
    pub fn buckets(&self) -> &[BucketRule] {
        &self.buckets
    }

    /// Check whether a name collides with a bucket name
    pub fn is_bucket_name(&self, name: &str) -> bool {
        self.buckets.iter().any(|b| b.name == name)
    }

    /// Classify an identifier. Returns the index of the first matching
    /// bucket, or `None` when the module is ignored or unmatched.
    pub fn classify(&self, identifier: Option<&str>) -> Option<usize> {
        let identifier = identifier?;

        // only the part after the last loader-chain separator matters
        let request = match identifier.rfind('!') {
            Some(idx) => &identifier[idx + 1..],
            None => identifier,
        };

        if self.ignore.iter().any(|p| p.matches(request)) {
            return None;
        }

        self.buckets
            .iter()
            .position(|bucket| bucket.patterns.iter().any(|p| p.matches(request)))
    }
}
