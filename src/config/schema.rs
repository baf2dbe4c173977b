//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// A pattern as written in configuration: either a literal path prefix
/// or an explicit regular expression table (`{ regex = "..." }`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSource {
    /// Literal path prefix, escaped before compilation
    Prefix(String),

    /// Regular expression source, compiled as written
    Regex { regex: String },
}

/// A config field accepting either a scalar or a list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// View the field as a slice regardless of input shape
    pub fn items(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// One bucket declaration: a name plus the path patterns routed to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket name, unique, becomes the chunk name
    pub name: String,

    /// Path pattern(s) routed into this bucket
    pub path: OneOrMany<PatternSource>,
}
